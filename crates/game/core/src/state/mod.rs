//! Authoritative game state representation.
//!
//! This module owns the value-only data structures: tiles, positions, the
//! board, the undo history and the persistable game snapshot. Runtime layers
//! clone or query this state but mutate it exclusively through the session.
mod board;
mod history;
mod position;
mod snapshot;
mod tile;

pub use board::Board;
pub use history::{History, HistorySnapshot};
pub use position::Position;
pub use snapshot::GameSnapshot;
pub use tile::{Tile, TileError};
