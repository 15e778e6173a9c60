//! Debounced save worker.
//!
//! Save triggers are coalesced: the first trigger opens a window of
//! `debounce`, later triggers only replace the payload, and one write lands
//! when the window closes. A flush writes immediately. A failed write keeps
//! its payload so the next trigger retries it; nothing is retried in a loop.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::events::{EventBus, PersistenceEvent};
use crate::repository::{RepositoryError, SaveData, SaveRepository};

/// Requests sent by the session worker.
pub enum SaveRequest {
    /// Save `data` once the debounce window closes.
    Schedule(SaveData),
    /// Save `data` right away.
    Flush {
        data: SaveData,
        reply: oneshot::Sender<Result<(), RepositoryError>>,
    },
}

pub struct PersistenceWorker {
    repository: Arc<dyn SaveRepository>,
    debounce: Duration,
    request_rx: mpsc::Receiver<SaveRequest>,
    event_bus: EventBus,
    pending: Option<SaveData>,
    deadline: Option<Instant>,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn SaveRepository>,
        debounce: Duration,
        request_rx: mpsc::Receiver<SaveRequest>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            repository,
            debounce,
            request_rx,
            event_bus,
            pending: None,
            deadline: None,
        }
    }

    /// Main worker loop. Exits once every sender is gone, writing whatever
    /// is still pending.
    pub async fn run(mut self) {
        loop {
            let deadline = self.deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                Some(request) = self.request_rx.recv() => {
                    self.handle_request(request);
                }
                _ = sleep_until(deadline), if self.deadline.is_some() => {
                    self.deadline = None;
                    let _ = self.write_pending();
                }
                else => break,
            }
        }

        if self.pending.is_some() {
            info!(target: "runtime::persistence", "Writing final save before shutdown");
            let _ = self.write_pending();
        }
    }

    fn handle_request(&mut self, request: SaveRequest) {
        match request {
            SaveRequest::Schedule(data) => {
                self.pending = Some(data);
                if self.deadline.is_none() {
                    self.deadline = Some(Instant::now() + self.debounce);
                    debug!(
                        target: "runtime::persistence",
                        debounce_ms = self.debounce.as_millis() as u64,
                        "Save scheduled"
                    );
                }
            }
            SaveRequest::Flush { data, reply } => {
                self.pending = Some(data);
                self.deadline = None;
                let result = self.write_pending();
                if reply.send(result).is_err() {
                    debug!(target: "runtime::persistence", "Flush reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Writes the pending payload. On failure the payload stays pending.
    fn write_pending(&mut self) -> Result<(), RepositoryError> {
        let Some(data) = self.pending.take() else {
            return Ok(());
        };
        let data = data.stamped();

        match self.repository.save_state(&data) {
            Ok(()) => {
                debug!(target: "runtime::persistence", currency = data.currency, "Progress saved");
                self.event_bus.publish(PersistenceEvent::Saved {
                    saved_at: data.saved_at,
                });
                Ok(())
            }
            Err(error) => {
                warn!(target: "runtime::persistence", %error, "Save failed; keeping payload for the next trigger");
                self.event_bus.publish(PersistenceEvent::SaveFailed {
                    error: error.to_string(),
                });
                self.pending = Some(data);
                Err(error)
            }
        }
    }
}
