//! Chat runtime executor

use super::{AppEvent, RuntimeHandle, Snapshot, UiEvent};
use crate::config::AppConfig;
use crate::session::{transition, ChatState, Effect, Event, PendingReply};
use crate::simulator::{ResponseSimulator, SimulatorError};
use crate::store::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

const BROADCAST_CAPACITY: usize = 64;

/// What the loop does after an event
enum Step {
    Publish,
    Quiet,
    Stop,
}

/// Event loop owning the store, the chat view state and the simulator
pub struct ChatRuntime<S>
where
    S: ResponseSimulator + 'static,
{
    store: Store,
    chat: ChatState,
    simulator: Arc<S>,
    reply_timeout: Duration,
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
    broadcast_tx: broadcast::Sender<UiEvent>,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl<S> ChatRuntime<S>
where
    S: ResponseSimulator + 'static,
{
    pub fn new(store: Store, simulator: S, config: &AppConfig) -> (Self, RuntimeHandle) {
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer);
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot {
            store: store.state().clone(),
            chat: ChatState::default().view(),
        });

        let handle = RuntimeHandle {
            event_tx: event_tx.clone(),
            broadcast_tx: broadcast_tx.clone(),
            snapshot_rx,
        };
        let runtime = Self {
            store,
            chat: ChatState::default(),
            simulator: Arc::new(simulator),
            reply_timeout: config.reply_timeout,
            event_rx,
            event_tx,
            broadcast_tx,
            snapshot_tx,
        };
        (runtime, handle)
    }

    /// Spawn the event loop onto the current tokio runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        tracing::info!(simulator = %self.simulator.name(), "Starting chat runtime");

        while let Some(event) = self.event_rx.recv().await {
            match self.process_event(event) {
                Ok(Step::Publish) => self.publish(),
                Ok(Step::Quiet) => {}
                Ok(Step::Stop) => break,
                Err(message) => {
                    tracing::debug!(error = %message, "Event rejected");
                    let _ = self.broadcast_tx.send(UiEvent::Error { message });
                    self.publish();
                }
            }
        }

        tracing::info!("Chat runtime stopped");
    }

    fn process_event(&mut self, event: AppEvent) -> Result<Step, String> {
        match event {
            AppEvent::CreateConversation => {
                self.store.create_conversation();
            }
            AppEvent::SelectConversation { conversation_id } => {
                self.store.set_active_conversation(&conversation_id);
            }
            AppEvent::RateConversation {
                conversation_id,
                rating,
                feedback,
            } => {
                let outcome = self
                    .store
                    .rate_conversation(&conversation_id, rating, feedback);
                if outcome.is_applied() {
                    tracing::info!(
                        conversation_id = %conversation_id,
                        %rating,
                        "Conversation rated"
                    );
                }
            }
            AppEvent::ToggleTheme => {
                self.store.toggle_theme();
            }
            AppEvent::Chat(event) => {
                // Pure state transition
                let result = transition(&self.chat, self.store.state(), event)
                    .map_err(|e| e.to_string())?;
                self.chat = result.new_state;
                for effect in result.effects {
                    self.execute_effect(effect);
                }
            }
            AppEvent::Sync { reply } => {
                // Caller may have given up waiting
                let _ = reply.send(self.snapshot());
                return Ok(Step::Quiet);
            }
            AppEvent::Shutdown => return Ok(Step::Stop),
        }
        Ok(Step::Publish)
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage {
                conversation_id,
                content,
                sender,
            } => {
                if self
                    .store
                    .add_message(&conversation_id, content, sender)
                    .is_none()
                {
                    tracing::debug!(
                        conversation_id = %conversation_id,
                        "Dropped message for unknown conversation"
                    );
                }
            }

            Effect::UpdateFeedback {
                conversation_id,
                message_id,
                patch,
            } => {
                self.store
                    .update_feedback(&conversation_id, &message_id, patch);
            }

            Effect::RequestReply { request } => self.request_reply(request),
        }
    }

    /// Ask the simulator in the background; the outcome comes back as an event
    fn request_reply(&self, request: PendingReply) {
        let simulator = self.simulator.clone();
        let event_tx = self.event_tx.clone();
        let timeout = self.reply_timeout;

        tokio::spawn(async move {
            tracing::debug!(
                request_id = request.request_id,
                conversation_id = %request.conversation_id,
                "Requesting reply"
            );
            let outcome = tokio::time::timeout(timeout, simulator.send(&request.text))
                .await
                .unwrap_or_else(|_| {
                    Err(SimulatorError::timeout(format!(
                        "No reply within {}ms",
                        timeout.as_millis()
                    )))
                });

            let event = match outcome {
                Ok(text) => Event::ReplyReceived {
                    request_id: request.request_id,
                    text,
                },
                Err(e) => {
                    tracing::warn!(
                        request_id = request.request_id,
                        error = %e,
                        "Reply request failed"
                    );
                    Event::ReplyFailed {
                        request_id: request.request_id,
                        message: e.message,
                    }
                }
            };
            // Runtime may have shut down while we waited
            let _ = event_tx.send(AppEvent::Chat(event)).await;
        });
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            store: self.store.state().clone(),
            chat: self.chat.view(),
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        let _ = self.broadcast_tx.send(UiEvent::StateChanged(snapshot));
    }
}
