//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use game_core::{GameConfig, GameSession, SessionPhase};

use crate::api::{Leaderboard, Result, RuntimeError, RuntimeHandle, StartupReport};
use crate::events::EventBus;
use crate::repository::{InMemorySaveRepo, SaveData, SaveRepository};
use crate::workers::{
    Command, LeaderboardWorker, PersistenceWorker, SaveRequest, SessionChannels, SessionWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Spawn seed. A random one is drawn when unset.
    pub game_seed: Option<u64>,
    /// Time between resolving a move and settling it (the slide animation).
    pub settle_delay: Duration,
    /// Window over which save triggers are coalesced into one write.
    pub save_debounce: Duration,
    /// Minimum spacing between leaderboard submissions.
    pub leaderboard_cooldown: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);
    pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_secs(2);
    pub const DEFAULT_LEADERBOARD_COOLDOWN: Duration = Duration::from_secs(60);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            game_seed: None,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            save_debounce: Self::DEFAULT_SAVE_DEBOUNCE,
            leaderboard_cooldown: Self::DEFAULT_LEADERBOARD_COOLDOWN,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates a game session
///
/// Runtime owns the workers; [`RuntimeHandle`] is the cloneable façade
/// clients use to talk to them.
pub struct Runtime {
    handle: RuntimeHandle,
    startup: StartupReport,

    session_worker_handle: JoinHandle<()>,
    persistence_worker_handle: JoinHandle<()>,
    leaderboard_worker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// What happened while loading the save.
    pub fn startup(&self) -> StartupReport {
        self.startup
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for every outstanding handle to be dropped, lets an in-flight
    /// move settle and writes the final save.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.session_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.persistence_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        if let Some(handle) = self.leaderboard_worker_handle {
            handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        info!(target: "runtime", "Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn SaveRepository>>,
    leaderboard: Option<Arc<dyn Leaderboard>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            leaderboard: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Where progress is loaded from and saved to. Defaults to memory.
    pub fn save_repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Leaderboard to submit best scores to (optional)
    pub fn leaderboard(mut self, leaderboard: Arc<dyn Leaderboard>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    /// Build the runtime
    ///
    /// Loads the save, grants the welcome bonus on a first launch, resumes
    /// or deals a board and starts the workers. A save that cannot be read
    /// is logged and replaced by fresh progress.
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemorySaveRepo::new()));

        let mut startup = StartupReport::default();
        let saved = match repository.load_state() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(error) => {
                warn!(target: "runtime", %error, "Failed to load save; starting fresh");
                startup.load_failed = true;
                SaveData {
                    has_entered_before: true,
                    ..SaveData::default()
                }
            }
        };

        let seed = config.game_seed.unwrap_or_else(rand::random);
        let mut session = GameSession::new(config.game_config.clone(), seed)
            .with_wallet(saved.currency, saved.best_score);

        if !saved.has_entered_before {
            let bonus = config.game_config.welcome_bonus;
            session.grant_reward(bonus);
            startup.welcome_bonus = Some(bonus);
            info!(target: "runtime", bonus, "First launch; welcome bonus granted");
        }

        // Nobody can subscribe before `build` returns, so the opening board
        // is reported through `startup` and `query_state` instead of events.
        match saved.current_game {
            Some(snapshot) if snapshot.grid.occupied_count() > 0 => {
                session.restore(snapshot);
                startup.restored = true;
            }
            _ => {
                session.start();
            }
        }
        startup.game_over = session.phase() == SessionPhase::GameOver;

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let (save_tx, save_rx) = mpsc::channel::<SaveRequest>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let persistence_worker =
            PersistenceWorker::new(repository, config.save_debounce, save_rx, event_bus.clone());
        let persistence_worker_handle = tokio::spawn(async move {
            persistence_worker.run().await;
        });

        let (score_tx, leaderboard_worker_handle) = match self.leaderboard {
            Some(leaderboard) => {
                let (score_tx, score_rx) = mpsc::channel::<u64>(config.command_buffer_size);
                let worker =
                    LeaderboardWorker::new(leaderboard, config.leaderboard_cooldown, score_rx);
                let handle = tokio::spawn(async move {
                    worker.run().await;
                });
                (Some(score_tx), Some(handle))
            }
            None => (None, None),
        };

        info!(
            target: "runtime",
            seed,
            restored = startup.restored,
            currency = session.currency(),
            "Runtime starting"
        );

        let session_worker = SessionWorker::new(
            session,
            config.settle_delay,
            SessionChannels {
                command_rx,
                event_bus: event_bus.clone(),
                save_tx,
                score_tx,
            },
        );
        let session_worker_handle = tokio::spawn(async move {
            session_worker.run().await;
        });

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            startup,
            session_worker_handle,
            persistence_worker_handle,
            leaderboard_worker_handle,
        })
    }
}
