//! Leaderboard collaborator contract.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    #[error("leaderboard rejected score {score}: {reason}")]
    Rejected { score: u64, reason: String },
}

/// Remote score board. The runtime calls it at most once per cooldown
/// window, always with the best score seen since the previous call.
#[async_trait]
pub trait Leaderboard: Send + Sync {
    async fn submit_score(&self, score: u64) -> Result<(), LeaderboardError>;
}

/// Leaderboard that records submissions locally.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    submissions: Mutex<Vec<u64>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores received so far, oldest first.
    pub fn submissions(&self) -> Vec<u64> {
        self.submissions
            .lock()
            .map(|scores| scores.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Leaderboard for InMemoryLeaderboard {
    async fn submit_score(&self, score: u64) -> Result<(), LeaderboardError> {
        let mut submissions = self
            .submissions
            .lock()
            .map_err(|_| LeaderboardError::Unavailable("lock poisoned".into()))?;
        submissions.push(score);
        Ok(())
    }
}
