//! Render targets for the feed.
//!
//! A [`Document`] owns named containers. Replacing a container's children
//! is the only mutation the poller performs, and it is all-or-nothing.

use std::{
    collections::HashMap,
    io::Write,
    sync::{Mutex, MutexGuard},
};

use crate::{response::IntoResponse, FeedError};

pub trait Document: Send + Sync {
    /// Replaces every child of container `id` with `children`, one plain
    /// text node per entry.
    fn replace_children(
        &self,
        id: &str,
        children: Vec<String>,
    ) -> Result<(), FeedError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
    containers: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty container, keeping the children of an existing one.
    pub fn insert_container(&self, id: &str) {
        lock(&self.containers).entry(id.to_string()).or_default();
    }

    pub fn remove_container(&self, id: &str) -> Option<Vec<String>> {
        lock(&self.containers).remove(id)
    }

    pub fn children(&self, id: &str) -> Option<Vec<String>> {
        lock(&self.containers).get(id).cloned()
    }
}

impl Document for MemoryDocument {
    fn replace_children(
        &self,
        id: &str,
        children: Vec<String>,
    ) -> Result<(), FeedError> {
        let mut containers = lock(&self.containers);
        let Some(container) = containers.get_mut(id) else {
            return Err(FeedError::ContainerNotFound { id: id.to_string() });
        };

        *container = children;

        Ok(())
    }
}

static CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// A single container drawn onto a terminal-like sink.
///
/// Every replace clears the screen and redraws the container from scratch.
#[derive(Debug)]
pub struct TerminalDocument<W> {
    container_id: String,
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalDocument<W> {
    pub fn new(container_id: &str, out: W) -> Self {
        Self {
            container_id: container_id.to_string(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Document for TerminalDocument<W> {
    fn replace_children(
        &self,
        id: &str,
        children: Vec<String>,
    ) -> Result<(), FeedError> {
        if id != self.container_id {
            return Err(FeedError::ContainerNotFound { id: id.to_string() });
        }

        // One write per frame.
        let mut frame = String::from(CLEAR_SCREEN);
        frame.push_str(&format!("# {}\n", self.container_id));
        for child in children {
            frame.push_str(&plain_text(&child));
            frame.push('\n');
        }

        let mut out = lock(&self.out);
        out.write_all(frame.as_bytes())
            .into_response("failed to write frame")?;
        out.flush().into_response("failed to flush frame")
    }
}

/// Drops control characters so event text cannot drive the terminal.
fn plain_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_replace_children_replaces() {
        // Arrange
        let document = MemoryDocument::new();
        document.insert_container("events");
        document
            .replace_children("events", vec!["a".to_string(), "b".to_string()])
            .unwrap();

        // Act
        let result =
            document.replace_children("events", vec!["c".to_string()]);

        // Assert
        assert!(result.is_ok());
        assert_eq!(document.children("events"), Some(vec!["c".to_string()]));
    }

    #[test]
    fn test_replace_children_missing_container() {
        // Arrange
        let document = MemoryDocument::new();

        // Act
        let result = document.replace_children("events", vec![]);

        // Assert
        assert!(matches!(
            result,
            Err(FeedError::ContainerNotFound { id }) if id == "events"
        ));
    }

    #[test]
    fn test_insert_container_keeps_children() {
        // Arrange
        let document = MemoryDocument::new();
        document.insert_container("events");
        document
            .replace_children("events", vec!["a".to_string()])
            .unwrap();

        // Act
        document.insert_container("events");

        // Assert
        assert_eq!(document.children("events"), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_terminal_frame() {
        // Arrange
        let document = TerminalDocument::new("events", Vec::<u8>::new());

        // Act
        document
            .replace_children(
                "events",
                vec!["alice pushed to main on T".to_string(), String::new()],
            )
            .unwrap();

        // Assert
        let out = String::from_utf8(document.into_inner()).unwrap();
        assert_eq!(
            out,
            "\x1b[2J\x1b[H# events\nalice pushed to main on T\n\n"
        );
    }

    #[test]
    fn test_terminal_strips_escape_sequences() {
        // Arrange
        let document = TerminalDocument::new("events", Vec::<u8>::new());

        // Act
        document
            .replace_children(
                "events",
                vec!["\x1b[31mmallory\x1b[0m pushed".to_string()],
            )
            .unwrap();

        // Assert
        let out = String::from_utf8(document.into_inner()).unwrap();
        assert!(out.ends_with("# events\n[31mmallory[0m pushed\n"));
    }

    #[test]
    fn test_terminal_unknown_container() {
        // Arrange
        let document = TerminalDocument::new("events", Vec::<u8>::new());

        // Act
        let result = document.replace_children("feed", vec![]);

        // Assert
        assert!(result.is_err());
        assert!(document.into_inner().is_empty());
    }
}
