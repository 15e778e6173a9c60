//! Runtime orchestration for the grid merge game.
//!
//! This crate wraps [`game_core::GameSession`] with the timing, persistence
//! and collaborator plumbing a real client needs. Consumers embed
//! [`Runtime`] and talk to the session through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] stores player progress
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    DropReason, InMemoryLeaderboard, Leaderboard, LeaderboardError, MoveResponse, Result,
    RuntimeError, RuntimeHandle, SessionView, StartupReport,
};
pub use events::{BoardEvent, EconomyEvent, Event, EventBus, PersistenceEvent, Topic};
pub use repository::{
    FileSaveRepository, InMemorySaveRepo, RepositoryError, SaveData, SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
