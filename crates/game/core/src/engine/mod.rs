//! Pure rule computations: move resolution and tile spawning.
//!
//! Nothing here mutates caller state. The session feeds board snapshots in
//! and applies the returned descriptions itself.
mod resolver;
mod spawn;

pub use resolver::{MoveOutcome, merge_reward, resolve};
pub use spawn::{Spawn, spawn_tile};
