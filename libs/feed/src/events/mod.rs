use self::response::Event;
use crate::{response::IntoResponse, FeedError, State};
use std::sync::Arc;
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info};

pub mod response;

pub(crate) async fn poll(state: &State) -> Result<usize, FeedError> {
    let text = state.client.get(&state.config.path).await?;

    let events = serde_json::from_str::<Vec<Event>>(&text)
        .into_response("failed to parse events")?;

    let lines = render(events);
    let count = lines.len();

    state
        .document
        .replace_children(&state.config.container_id, lines)?;

    Ok(count)
}

/// Feed lines for one response, last event first.
pub fn render(mut events: Vec<Event>) -> Vec<String> {
    events.reverse();
    events.iter().map(Event::message).collect()
}

/// Owns the polling task. Dropping it also ends the task.
#[derive(Debug)]
pub struct PollerHandle {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl PollerHandle {
    /// Cancels the timer and waits for the task to end. A poll that is in
    /// flight is dropped before it touches the document.
    pub async fn stop(self) {
        let _ = self.stop.send(());

        if let Err(e) = self.handle.await {
            error!(task = "stop polling events", err = e.to_string());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[tracing::instrument(skip_all, fields(path = %state.config.path))]
pub(crate) fn spawn_service_to_poll_events(
    state: Arc<State>,
) -> PollerHandle {
    let (stop, mut stopped) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        // The first tick completes immediately. Polls run inline, so a tick
        // that comes due mid-poll is skipped instead of overlapping.
        let mut ticker = interval(state.config.pause);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = &mut stopped => break,
                result = poll(&state) => result,
            };

            match result {
                Ok(count) => debug!(task = "poll events", count),
                Err(e) => error!(task = "poll events", err = e.to_string()),
            }
        }

        info!(task = "stop polling events");
    });

    PollerHandle { stop, handle }
}
