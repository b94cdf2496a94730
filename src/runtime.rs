//! Runtime for driving the chat shell
//!
//! A single task owns the store and the chat view state and processes events
//! one at a time. Reply requests run as background tasks and report back
//! through the same event channel.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;

use crate::session::{self, ChatView};
use crate::store::{ConversationId, Rating, StoreState};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Everything the runtime reacts to
#[derive(Debug)]
pub enum AppEvent {
    CreateConversation,
    SelectConversation {
        conversation_id: ConversationId,
    },
    RateConversation {
        conversation_id: ConversationId,
        rating: Rating,
        feedback: Option<String>,
    },
    ToggleTheme,
    /// Chat view input, including simulator outcomes
    Chat(session::Event),
    /// Answered with the current snapshot once every earlier event is applied
    Sync {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown,
}

impl From<session::Event> for AppEvent {
    fn from(event: session::Event) -> Self {
        AppEvent::Chat(event)
    }
}

/// Full presentation state, published after every processed event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub store: StoreState,
    pub chat: ChatView,
}

/// Events sent to subscribed views
#[derive(Debug, Clone)]
pub enum UiEvent {
    StateChanged(Snapshot),
    Error { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Runtime has shut down")]
    Closed,
}

/// Handle to interact with a running [`ChatRuntime`]
#[derive(Clone)]
pub struct RuntimeHandle {
    event_tx: mpsc::Sender<AppEvent>,
    broadcast_tx: broadcast::Sender<UiEvent>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl RuntimeHandle {
    pub async fn send(&self, event: impl Into<AppEvent>) -> Result<(), RuntimeError> {
        self.event_tx
            .send(event.into())
            .await
            .map_err(|_| RuntimeError::Closed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Snapshot taken after every event sent before this call was processed.
    /// Replies still in flight are not waited for.
    pub async fn settled(&self) -> Result<Snapshot, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(AppEvent::Sync { reply }).await?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    /// Receiver that resolves on every new snapshot
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Wait until a snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&Snapshot) -> bool,
    ) -> Result<Snapshot, RuntimeError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        Ok(snapshot.clone())
    }
}
