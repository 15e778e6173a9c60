//! Persistable view of an in-progress game.

use super::{Board, HistorySnapshot};

/// Everything needed to resume a game: the live board, its score, the
/// level-up gate and the undo history (oldest first).
///
/// Field names follow the save schema (`highestLevelReached`, `grid`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameSnapshot {
    pub score: u64,
    pub highest_level_reached: u32,
    pub grid: Board,
    #[cfg_attr(feature = "serde", serde(default))]
    pub history: Vec<HistorySnapshot>,
}

impl GameSnapshot {
    /// Snapshot of a board with no score and no history.
    pub fn from_board(grid: Board, highest_level_reached: u32) -> Self {
        Self {
            score: 0,
            highest_level_reached,
            grid,
            history: Vec::new(),
        }
    }
}
