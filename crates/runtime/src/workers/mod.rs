//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the game; persistence and leaderboard workers
//! absorb slow or failing collaborators so gameplay never waits on them.

mod leaderboard;
mod persistence;
mod session;

pub use leaderboard::LeaderboardWorker;
pub use persistence::{PersistenceWorker, SaveRequest};
pub use session::{Command, SessionChannels, SessionWorker};
