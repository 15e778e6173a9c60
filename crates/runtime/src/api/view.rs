//! Read-only views handed out by the runtime.

use serde::{Deserialize, Serialize};

use game_core::{Board, MoveOutcome, SessionPhase};

/// Snapshot of the live session as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub board: Board,
    pub score: u64,
    pub best_score: u64,
    pub currency: u64,
    pub highest_level_reached: u32,
    /// Undo steps available.
    pub history_len: usize,
    pub paused: bool,
    /// The move currently animating, if any.
    pub in_flight: Option<MoveOutcome>,
}

impl SessionView {
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

/// Why a direction input was discarded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DropReason {
    /// A previous move is still settling.
    InFlight,
    /// Input is paused (menu open, ad playing).
    Paused,
    /// The game is over.
    GameOver,
}

/// Answer to a direction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResponse {
    /// Tiles are moving; the board settles after the settle delay.
    Accepted(MoveOutcome),
    /// Nothing could move in that direction.
    Unchanged,
    /// Input was ignored.
    Dropped(DropReason),
}

/// What happened while the runtime was being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartupReport {
    /// A game in progress was loaded from the save.
    pub restored: bool,
    /// Currency granted because this was the player's first launch.
    pub welcome_bonus: Option<u64>,
    /// The save could not be read and progress was reset.
    pub load_failed: bool,
    /// The opening board has no moves left.
    pub game_over: bool,
}
