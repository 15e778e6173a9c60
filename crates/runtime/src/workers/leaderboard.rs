//! Rate-limited score submission.
//!
//! At most one submission leaves per cooldown window. Scores arriving inside
//! a window are coalesced to their maximum and sent when it closes.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, warn};

use crate::api::Leaderboard;

pub struct LeaderboardWorker {
    leaderboard: Arc<dyn Leaderboard>,
    cooldown: Duration,
    score_rx: mpsc::Receiver<u64>,
    /// Highest score not yet accepted by the leaderboard.
    pending: Option<u64>,
    /// Highest score the leaderboard has accepted.
    submitted: Option<u64>,
    last_attempt: Option<Instant>,
}

impl LeaderboardWorker {
    pub fn new(
        leaderboard: Arc<dyn Leaderboard>,
        cooldown: Duration,
        score_rx: mpsc::Receiver<u64>,
    ) -> Self {
        Self {
            leaderboard,
            cooldown,
            score_rx,
            pending: None,
            submitted: None,
            last_attempt: None,
        }
    }

    pub async fn run(mut self) {
        loop {
            let next_slot = self.next_slot();
            let waiting = self.pending.is_some() && next_slot > Instant::now();
            tokio::select! {
                received = self.score_rx.recv() => {
                    let Some(score) = received else {
                        break;
                    };
                    self.pending = Some(self.pending.map_or(score, |pending| pending.max(score)));
                    if self.next_slot() <= Instant::now() {
                        self.submit().await;
                    }
                }
                _ = sleep_until(next_slot), if waiting => {
                    self.submit().await;
                }
            }
        }

        // Shutdown does not wait out the cooldown.
        if let Some(score) = self.pending {
            debug!(target: "runtime::leaderboard", score, "Unsent score dropped on shutdown");
        }
    }

    fn next_slot(&self) -> Instant {
        self.last_attempt
            .map_or_else(Instant::now, |last| last + self.cooldown)
    }

    async fn submit(&mut self) {
        let Some(score) = self.pending.take() else {
            return;
        };
        if self.submitted.is_some_and(|best| best >= score) {
            debug!(target: "runtime::leaderboard", score, "Score already submitted");
            return;
        }

        self.last_attempt = Some(Instant::now());
        match self.leaderboard.submit_score(score).await {
            Ok(()) => {
                debug!(target: "runtime::leaderboard", score, "Score submitted");
                self.submitted = Some(score);
            }
            Err(error) => {
                warn!(target: "runtime::leaderboard", score, %error, "Score submission failed");
                // Retried when the next slot opens.
                self.pending = Some(score);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::{InMemoryLeaderboard, LeaderboardError};

    /// Refuses the first `failures` submissions, then accepts.
    #[derive(Default)]
    struct FlakyLeaderboard {
        failures: Mutex<usize>,
        attempts: Mutex<Vec<u64>>,
        accepted: InMemoryLeaderboard,
    }

    impl FlakyLeaderboard {
        fn failing(failures: usize) -> Self {
            Self {
                failures: Mutex::new(failures),
                ..Self::default()
            }
        }

        fn attempts(&self) -> Vec<u64> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Leaderboard for FlakyLeaderboard {
        async fn submit_score(&self, score: u64) -> Result<(), LeaderboardError> {
            self.attempts.lock().unwrap().push(score);
            {
                let mut failures = self.failures.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(LeaderboardError::Unavailable("offline".into()));
                }
            }
            self.accepted.submit_score(score).await
        }
    }

    fn spawn_worker(
        board: Arc<dyn Leaderboard>,
    ) -> (mpsc::Sender<u64>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(8);
        let worker = LeaderboardWorker::new(board, Duration::from_secs(60), rx);
        (tx, tokio::spawn(worker.run()))
    }

    #[tokio::test(start_paused = true)]
    async fn first_score_goes_out_immediately() {
        let board = Arc::new(InMemoryLeaderboard::new());
        let (tx, _worker) = spawn_worker(board.clone());

        tx.send(128).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(board.submissions(), vec![128]);
    }

    #[tokio::test(start_paused = true)]
    async fn scores_inside_the_cooldown_are_coalesced() {
        let board = Arc::new(InMemoryLeaderboard::new());
        let (tx, _worker) = spawn_worker(board.clone());

        tx.send(100).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        for score in [300, 200] {
            tx.send(score).await.unwrap();
        }
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(board.submissions(), vec![100]);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(board.submissions(), vec![100, 300]);
    }

    #[tokio::test(start_paused = true)]
    async fn lower_scores_are_not_resubmitted() {
        let board = Arc::new(InMemoryLeaderboard::new());
        let (tx, _worker) = spawn_worker(board.clone());

        tx.send(500).await.unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        tx.send(400).await.unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(board.submissions(), vec![500]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_is_retried_after_the_cooldown() {
        let board = Arc::new(FlakyLeaderboard::failing(1));
        let (tx, _worker) = spawn_worker(board.clone());

        tx.send(200).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(board.attempts(), vec![200]);
        assert!(board.accepted.submissions().is_empty());

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(board.attempts(), vec![200]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(board.attempts(), vec![200, 200]);
        assert_eq!(board.accepted.submissions(), vec![200]);
    }
}
