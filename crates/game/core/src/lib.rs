//! Deterministic rules for the grid merge game.
//!
//! `game-core` owns the board model, the move resolver and the session state
//! machine. Nothing here performs I/O or reads the clock; the runtime crate
//! wraps [`GameSession`] with timers, persistence and event delivery.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod session;
pub mod state;

pub use action::{Direction, TileAction};
pub use config::GameConfig;
pub use engine::{MoveOutcome, Spawn, merge_reward, resolve, spawn_tile};
pub use env::{PcgRng, RngOracle, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use session::{
    GameSession, SessionError, SessionPhase, SettleReport, SpecialKind, SpecialReport,
};
pub use state::{Board, GameSnapshot, History, HistorySnapshot, Position, Tile, TileError};
