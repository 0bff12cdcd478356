use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DefaultOnError};

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Push,
    PullRequest,
    Merge,
    #[serde(other)]
    Unknown,
}

/// One repository activity as served by the `/data` endpoint.
///
/// Every text field may be absent or `null`; it then renders as an empty
/// string. An `action` that is not a string reads as `None`.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Default)]
pub struct Event {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub action: Option<Action>,
    pub author: Option<String>,
    pub to_branch: Option<String>,
    pub from_branch: Option<String>,
    pub timestamp: Option<String>,
}

impl Event {
    /// Feed line for this event, empty for an unrecognised action.
    pub fn message(&self) -> String {
        let author = text(&self.author);
        let to_branch = text(&self.to_branch);
        let from_branch = text(&self.from_branch);
        let timestamp = text(&self.timestamp);

        match self.action {
            Some(Action::Push) => {
                format!("{} pushed to {} on {}", author, to_branch, timestamp)
            }
            Some(Action::PullRequest) => format!(
                "{} submitted a pull request from {} to {} on {}",
                author, from_branch, to_branch, timestamp
            ),
            Some(Action::Merge) => format!(
                "{} merged branch {} to {} on {}",
                author, from_branch, to_branch, timestamp
            ),
            Some(Action::Unknown) | None => String::new(),
        }
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
