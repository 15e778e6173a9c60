//! Player intents and the per-tile changes a move produces.
//!
//! [`Direction`] is the only input the resolver accepts. [`TileAction`] is
//! its output vocabulary, consumed both by the session (to mutate the board)
//! and by renderers (to animate it).
mod direction;
mod tile_action;

pub use direction::Direction;
pub use tile_action::TileAction;
