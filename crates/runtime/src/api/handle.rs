//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing moves, paying for special actions or streaming events from
//! specific topics.

use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Direction, Position, SpecialReport};

use super::errors::{Result, RuntimeError};
use super::view::{MoveResponse, SessionView};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Slide the board. Input arriving while a move settles, while paused
    /// or after game over is dropped rather than queued.
    pub async fn move_tiles(&self, direction: Direction) -> Result<MoveResponse> {
        self.request(|reply| Command::Move { direction, reply })
            .await
    }

    /// Pay to restore the previous board.
    pub async fn undo(&self) -> Result<SpecialReport> {
        self.request(|reply| Command::Undo { reply }).await?
    }

    /// Pay to remove the tile at `position`.
    pub async fn destroy(&self, position: Position) -> Result<SpecialReport> {
        self.request(|reply| Command::Destroy { position, reply })
            .await?
    }

    /// Pay to exchange two tiles.
    pub async fn swap(&self, first: Position, second: Position) -> Result<SpecialReport> {
        self.request(|reply| Command::Swap {
            first,
            second,
            reply,
        })
        .await?
    }

    /// Credit currency granted externally (e.g. a completed ad). Returns the
    /// new balance.
    pub async fn grant_reward(&self, amount: u64) -> Result<u64> {
        self.request(|reply| Command::GrantReward { amount, reply })
            .await
    }

    /// Abandon the current game and deal a new board.
    pub async fn restart(&self) -> Result<SessionView> {
        self.request(|reply| Command::Restart { reply }).await
    }

    /// Gate direction input. A move already in flight still settles.
    pub async fn set_paused(&self, paused: bool) -> Result<()> {
        self.request(|reply| Command::SetPaused { paused, reply })
            .await
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_state(&self) -> Result<SessionView> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Write the current progress now instead of waiting for the debounce
    /// window. Call on visibility loss or before exiting.
    pub async fn flush_save(&self) -> Result<()> {
        self.request(|reply| Command::FlushSave { reply })
            .await?
            .map_err(RuntimeError::from)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Board` - Moves, spawns, special actions, game over
    /// - `Topic::Economy` - Score, currency and level-up changes
    /// - `Topic::Persistence` - Save outcomes
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
