use arrayvec::ArrayVec;

use crate::state::{Position, Tile};

/// One observable change produced by resolving a move.
///
/// Renderers animate these in order; the session replays them onto the board
/// with [`Board::apply_actions`](crate::state::Board::apply_actions).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TileAction {
    /// A tile relocates without merging.
    Slide {
        from: Position,
        to: Position,
        tile: Tile,
    },
    /// Two equal tiles combine into one of double value.
    ///
    /// `first` is the tile nearer the wall of travel, `second` the one that
    /// caught up with it. `tile` is the merged result.
    Merge {
        first: Position,
        second: Position,
        to: Position,
        tile: Tile,
    },
}

impl TileAction {
    /// Cells vacated by this action (one for a slide, two for a merge).
    pub fn sources(&self) -> ArrayVec<Position, 2> {
        let mut sources = ArrayVec::new();
        match *self {
            TileAction::Slide { from, .. } => sources.push(from),
            TileAction::Merge { first, second, .. } => {
                sources.push(first);
                sources.push(second);
            }
        }
        sources
    }

    pub fn destination(&self) -> Position {
        match *self {
            TileAction::Slide { to, .. } | TileAction::Merge { to, .. } => to,
        }
    }

    /// Tile occupying the destination once the action completes.
    pub fn tile(&self) -> Tile {
        match *self {
            TileAction::Slide { tile, .. } | TileAction::Merge { tile, .. } => tile,
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, TileAction::Merge { .. })
    }
}
