use crate::engine::{MoveOutcome, Spawn};
use crate::state::{Board, Position, Tile};

use super::SessionPhase;

/// Result of settling a move (or of a move that changed nothing).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettleReport {
    pub outcome: MoveOutcome,
    /// Tile added after the move. `None` when nothing moved.
    pub spawn: Option<Spawn>,
    /// New highest level, present only when this move raised it past the
    /// celebration threshold.
    pub level_up: Option<u32>,
    /// Board after merges and the spawn.
    pub board: Board,
    pub score: u64,
    pub currency: u64,
    pub phase: SessionPhase,
}

impl SettleReport {
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

/// Which paid action was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    Undo,
    Destroy { position: Position, tile: Tile },
    Swap { first: Position, second: Position },
}

/// Result of a paid special action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialReport {
    pub kind: SpecialKind,
    /// Currency deducted for the action.
    pub charged: u64,
    pub board: Board,
    pub score: u64,
    pub currency: u64,
    pub phase: SessionPhase,
}
