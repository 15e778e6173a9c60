//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BoardEvent, EconomyEvent, PersistenceEvent};

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Moves, spawns, special actions, game over
    Board,
    /// Score, currency and level-up changes
    Economy,
    /// Save and load outcomes
    Persistence,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Board(BoardEvent),
    Economy(EconomyEvent),
    Persistence(PersistenceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Board(_) => Topic::Board,
            Event::Economy(_) => Topic::Economy,
            Event::Persistence(_) => Topic::Persistence,
        }
    }
}

impl From<BoardEvent> for Event {
    fn from(event: BoardEvent) -> Self {
        Event::Board(event)
    }
}

impl From<EconomyEvent> for Event {
    fn from(event: EconomyEvent) -> Self {
        Event::Economy(event)
    }
}

impl From<PersistenceEvent> for Event {
    fn from(event: PersistenceEvent) -> Self {
        Event::Persistence(event)
    }
}

#[derive(Debug)]
struct Channels {
    board: broadcast::Sender<Event>,
    economy: broadcast::Sender<Event>,
    persistence: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Board => &self.board,
            Topic::Economy => &self.economy,
            Topic::Persistence => &self.persistence,
        }
    }
}

/// Topic-based event bus
///
/// Every topic owns its own broadcast channel, so a slow economy listener
/// never makes a renderer lag behind board events. Publishing is
/// best-effort: events sent while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                board: broadcast::channel(capacity).0,
                economy: broadcast::channel(capacity).0,
                persistence: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
