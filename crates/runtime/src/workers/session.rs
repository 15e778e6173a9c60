//! Session worker that owns the authoritative [`GameSession`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives the
//! resolve/settle split with a timer, publishes events and forwards save
//! requests and scores to the other workers.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, info, warn};

use game_core::{
    Direction, GameSession, Position, SessionError, SessionPhase, SettleReport, SpecialKind,
    SpecialReport,
};

use crate::api::{DropReason, MoveResponse, Result, SessionView};
use crate::events::{BoardEvent, EconomyEvent, EventBus};
use crate::repository::{RepositoryError, SaveData};
use crate::workers::persistence::SaveRequest;

/// Commands that can be sent to the session worker
pub enum Command {
    Move {
        direction: Direction,
        reply: oneshot::Sender<MoveResponse>,
    },
    Undo {
        reply: oneshot::Sender<Result<SpecialReport>>,
    },
    Destroy {
        position: Position,
        reply: oneshot::Sender<Result<SpecialReport>>,
    },
    Swap {
        first: Position,
        second: Position,
        reply: oneshot::Sender<Result<SpecialReport>>,
    },
    GrantReward {
        amount: u64,
        reply: oneshot::Sender<u64>,
    },
    Restart {
        reply: oneshot::Sender<SessionView>,
    },
    SetPaused {
        paused: bool,
        reply: oneshot::Sender<()>,
    },
    QueryState {
        reply: oneshot::Sender<SessionView>,
    },
    FlushSave {
        reply: oneshot::Sender<std::result::Result<(), RepositoryError>>,
    },
}

/// Channels the session worker talks through.
pub struct SessionChannels {
    pub command_rx: mpsc::Receiver<Command>,
    pub event_bus: EventBus,
    pub save_tx: mpsc::Sender<SaveRequest>,
    pub score_tx: Option<mpsc::Sender<u64>>,
}

/// Background task that processes gameplay commands.
pub struct SessionWorker {
    session: GameSession,
    settle_delay: Duration,
    paused: bool,
    /// When the in-flight move settles. `Some` exactly while the session is
    /// resolving.
    settle_at: Option<Instant>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    save_tx: mpsc::Sender<SaveRequest>,
    score_tx: Option<mpsc::Sender<u64>>,
}

impl SessionWorker {
    pub fn new(session: GameSession, settle_delay: Duration, channels: SessionChannels) -> Self {
        info!(
            target: "runtime::worker",
            phase = %session.phase(),
            score = session.score(),
            currency = session.currency(),
            "SessionWorker initialized"
        );

        Self {
            session,
            settle_delay,
            paused: false,
            settle_at: None,
            command_rx: channels.command_rx,
            event_bus: channels.event_bus,
            save_tx: channels.save_tx,
            score_tx: channels.score_tx,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until every handle is dropped. A move still in flight at that
    /// point settles first, then the final state is handed to persistence.
    pub async fn run(mut self) {
        // Persist the dealt board and any welcome bonus.
        self.schedule_save().await;

        loop {
            let settle_at = self.settle_at.unwrap_or_else(Instant::now);
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                _ = sleep_until(settle_at), if self.settle_at.is_some() => {
                    self.settle_pending().await;
                }
                else => break,
            }
        }

        self.schedule_save().await;
        debug!(target: "runtime::worker", "SessionWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Move { direction, reply } => {
                let response = self.handle_move(direction).await;
                if reply.send(response).is_err() {
                    debug!(target: "runtime::worker", "Move reply channel closed (caller dropped)");
                }
            }
            Command::Undo { reply } => {
                let result = self.session.undo();
                let result = self.finish_special(result).await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Undo reply channel closed (caller dropped)");
                }
            }
            Command::Destroy { position, reply } => {
                let result = self.session.destroy(position);
                let result = self.finish_special(result).await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Destroy reply channel closed (caller dropped)");
                }
            }
            Command::Swap {
                first,
                second,
                reply,
            } => {
                let result = self.session.swap(first, second);
                let result = self.finish_special(result).await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Swap reply channel closed (caller dropped)");
                }
            }
            Command::GrantReward { amount, reply } => {
                let currency = self.session.grant_reward(amount);
                info!(target: "runtime::worker", amount, currency, "Reward granted");
                self.event_bus
                    .publish(EconomyEvent::RewardGranted { amount, currency });
                self.schedule_save().await;
                let _ = reply.send(currency);
            }
            Command::Restart { reply } => {
                self.handle_restart().await;
                let _ = reply.send(self.view());
            }
            Command::SetPaused { paused, reply } => {
                if self.paused != paused {
                    debug!(target: "runtime::worker", paused, "Input gate changed");
                }
                self.paused = paused;
                let _ = reply.send(());
            }
            Command::QueryState { reply } => {
                if reply.send(self.view()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
            Command::FlushSave { reply } => {
                let request = SaveRequest::Flush {
                    data: self.save_data(),
                    reply,
                };
                if self.save_tx.send(request).await.is_err() {
                    warn!(target: "runtime::worker", "Persistence worker gone; flush skipped");
                }
            }
        }
    }

    async fn handle_move(&mut self, direction: Direction) -> MoveResponse {
        if self.paused {
            debug!(target: "runtime::worker", %direction, "Input dropped while paused");
            return MoveResponse::Dropped(DropReason::Paused);
        }

        match self.session.begin_move(direction) {
            Ok(outcome) if outcome.moved => {
                debug!(
                    target: "runtime::worker",
                    %direction,
                    actions = outcome.actions.len(),
                    merges = outcome.merges,
                    "Move resolved"
                );
                self.settle_at = Some(Instant::now() + self.settle_delay);
                self.event_bus.publish(BoardEvent::MoveResolved {
                    outcome: outcome.clone(),
                });
                MoveResponse::Accepted(outcome)
            }
            Ok(_) => {
                debug!(target: "runtime::worker", %direction, "Move changed nothing");
                if self.session.phase() == SessionPhase::GameOver {
                    self.publish_game_over();
                }
                MoveResponse::Unchanged
            }
            Err(SessionError::NotAcceptingInput { phase }) => {
                debug!(target: "runtime::worker", %direction, %phase, "Input dropped");
                let reason = match phase {
                    SessionPhase::GameOver => DropReason::GameOver,
                    _ => DropReason::InFlight,
                };
                MoveResponse::Dropped(reason)
            }
            Err(error) => {
                warn!(target: "runtime::worker", %error, "Unexpected move rejection");
                MoveResponse::Dropped(DropReason::InFlight)
            }
        }
    }

    async fn settle_pending(&mut self) {
        self.settle_at = None;
        let previous_best = self.session.best_score();
        let report = match self.session.settle() {
            Ok(report) => report,
            Err(error) => {
                warn!(target: "runtime::worker", %error, "Settle timer fired without a pending move");
                return;
            }
        };

        let best_score = self.session.best_score();
        self.publish_settle(&report, best_score > previous_best);
        self.event_bus
            .publish(BoardEvent::MoveSettled { report: report.clone() });

        if report.is_game_over() {
            self.publish_game_over();
        }

        self.schedule_save().await;
        if best_score > previous_best {
            self.submit_score(best_score);
        }
    }

    fn publish_settle(&self, report: &SettleReport, new_best: bool) {
        if report.outcome.score_delta > 0 {
            self.event_bus.publish(EconomyEvent::ScoreChanged {
                score: report.score,
                best_score: self.session.best_score(),
            });
        }
        if new_best {
            self.event_bus.publish(EconomyEvent::NewBestScore {
                best_score: self.session.best_score(),
            });
        }
        if report.outcome.reward > 0 {
            self.event_bus.publish(EconomyEvent::MergeReward {
                amount: report.outcome.reward,
                currency: report.currency,
            });
        }
        if let Some(level) = report.level_up {
            info!(target: "runtime::worker", level, "New highest level");
            self.event_bus.publish(EconomyEvent::LevelUp { level });
        }
    }

    async fn finish_special(
        &mut self,
        result: std::result::Result<SpecialReport, SessionError>,
    ) -> Result<SpecialReport> {
        match result {
            Ok(report) => {
                info!(
                    target: "runtime::worker",
                    action = special_label(&report.kind),
                    charged = report.charged,
                    currency = report.currency,
                    "Special action applied"
                );
                self.event_bus.publish(EconomyEvent::Spent {
                    amount: report.charged,
                    currency: report.currency,
                });
                if matches!(report.kind, SpecialKind::Undo) {
                    self.event_bus.publish(EconomyEvent::ScoreChanged {
                        score: report.score,
                        best_score: self.session.best_score(),
                    });
                }
                self.event_bus.publish(BoardEvent::SpecialApplied {
                    report: report.clone(),
                });
                self.schedule_save().await;
                Ok(report)
            }
            Err(error) => {
                debug!(target: "runtime::worker", %error, "Special action refused");
                if let SessionError::InsufficientFunds {
                    required,
                    available,
                } = error
                {
                    self.event_bus.publish(EconomyEvent::InsufficientFunds {
                        required,
                        available,
                    });
                }
                Err(error.into())
            }
        }
    }

    async fn handle_restart(&mut self) {
        self.settle_at = None;
        let spawns = self.session.restart();
        info!(target: "runtime::worker", best_score = self.session.best_score(), "Game restarted");
        self.event_bus.publish(BoardEvent::GameStarted {
            board: *self.session.board(),
            spawns,
        });
        self.schedule_save().await;
    }

    fn publish_game_over(&self) {
        info!(
            target: "runtime::worker",
            score = self.session.score(),
            best_score = self.session.best_score(),
            "Game over"
        );
        self.event_bus.publish(BoardEvent::GameOver {
            score: self.session.score(),
            best_score: self.session.best_score(),
        });
    }

    fn submit_score(&self, score: u64) {
        let Some(score_tx) = &self.score_tx else {
            return;
        };
        if let Err(error) = score_tx.try_send(score) {
            debug!(target: "runtime::worker", %error, "Score not forwarded to leaderboard");
        }
    }

    async fn schedule_save(&self) {
        let request = SaveRequest::Schedule(self.save_data());
        if self.save_tx.send(request).await.is_err() {
            warn!(target: "runtime::worker", "Persistence worker gone; progress not saved");
        }
    }

    fn save_data(&self) -> SaveData {
        SaveData {
            currency: self.session.currency(),
            best_score: self.session.best_score(),
            has_entered_before: true,
            current_game: Some(self.session.snapshot()),
            saved_at: None,
        }
    }

    fn view(&self) -> SessionView {
        SessionView {
            phase: self.session.phase(),
            board: *self.session.board(),
            score: self.session.score(),
            best_score: self.session.best_score(),
            currency: self.session.currency(),
            highest_level_reached: self.session.highest_level_reached(),
            history_len: self.session.history().len(),
            paused: self.paused,
            in_flight: self.session.pending().cloned(),
        }
    }
}

fn special_label(kind: &SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Undo => "undo",
        SpecialKind::Destroy { .. } => "destroy",
        SpecialKind::Swap { .. } => "swap",
    }
}
