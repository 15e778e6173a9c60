//! Event types for different topics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::{Board, MoveOutcome, SettleReport, Spawn, SpecialReport};

/// Board-level events, in the order a renderer should play them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A restart dealt a fresh board.
    GameStarted { board: Board, spawns: Vec<Spawn> },

    /// Tiles are about to move. Carries the ordered slide/merge actions so
    /// the renderer can animate them during the settle delay.
    MoveResolved { outcome: MoveOutcome },

    /// The move has been applied and a tile spawned.
    MoveSettled { report: SettleReport },

    /// Undo, destroy or swap was applied.
    SpecialApplied { report: SpecialReport },

    /// No legal move remains.
    GameOver { score: u64, best_score: u64 },
}

/// Score and wallet changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EconomyEvent {
    /// Score changed after a settle or undo.
    ScoreChanged { score: u64, best_score: u64 },

    /// The best score was beaten.
    NewBestScore { best_score: u64 },

    /// Currency earned from merges.
    MergeReward { amount: u64, currency: u64 },

    /// Currency spent on a special action.
    Spent { amount: u64, currency: u64 },

    /// Currency granted from outside the game (welcome bonus, watched ad).
    RewardGranted { amount: u64, currency: u64 },

    /// A special action was refused for lack of currency.
    InsufficientFunds { required: u64, available: u64 },

    /// First tile of a new level at or above the celebration threshold.
    LevelUp { level: u32 },
}

/// Save outcomes published by the persistence worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PersistenceEvent {
    Saved { saved_at: Option<DateTime<Utc>> },
    SaveFailed { error: String },
}
