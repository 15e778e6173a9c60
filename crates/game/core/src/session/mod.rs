//! Session state machine driving a single game.
//!
//! [`GameSession`] owns the board and economy and is the only place they are
//! mutated. A move is split in two so hosts can animate in between:
//!
//! ```text
//! Idle ─start/restore─▶ AwaitingInput ─begin_move─▶ Resolving ─settle─▶ Settling ─▶ AwaitingInput
//!                             ▲                                                    └─▶ GameOver
//!                             └──────────── undo / destroy ────────────────────────────────┘
//! ```
//!
//! [`GameSession::play`] runs both halves back to back for hosts that do not
//! animate.
mod errors;
mod report;

pub use errors::SessionError;
pub use report::{SettleReport, SpecialKind, SpecialReport};

use crate::action::Direction;
use crate::config::GameConfig;
use crate::engine::{MoveOutcome, Spawn, resolve, spawn_tile};
use crate::env::{PcgRng, RngOracle};
use crate::state::{Board, GameSnapshot, History, HistorySnapshot, Position, Tile};

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// Created, no board dealt yet.
    Idle,
    /// Ready for a direction or a special action.
    AwaitingInput,
    /// A move has been resolved and is waiting for [`GameSession::settle`].
    Resolving,
    /// Applying a resolved move. Only observable from inside `settle`.
    Settling,
    /// The board is full with no adjacent equal tiles.
    GameOver,
}

impl SessionPhase {
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub const fn accepts_special_actions(self) -> bool {
        matches!(self, Self::AwaitingInput | Self::GameOver)
    }
}

/// Authoritative state of one game plus the economy around it.
#[derive(Debug)]
pub struct GameSession<R = PcgRng> {
    config: GameConfig,
    rng: R,
    /// Seed mixed into every spawn roll. Fixed for the session's lifetime.
    game_seed: u64,
    /// Spawn counter; advances after every spawn so rolls never repeat.
    nonce: u64,
    phase: SessionPhase,
    board: Board,
    score: u64,
    best_score: u64,
    currency: u64,
    highest_level_reached: u32,
    history: History,
    pending: Option<MoveOutcome>,
}

impl GameSession<PcgRng> {
    /// Creates an idle session using the default PCG spawn generator.
    pub fn new(config: GameConfig, game_seed: u64) -> Self {
        Self::with_rng(config, PcgRng, game_seed)
    }
}

impl<R: RngOracle> GameSession<R> {
    /// Creates an idle session with a custom spawn generator.
    pub fn with_rng(config: GameConfig, rng: R, game_seed: u64) -> Self {
        let history = History::new(config.history_capacity);
        let highest_level_reached = config.celebration_level;
        Self {
            config,
            rng,
            game_seed,
            nonce: 0,
            phase: SessionPhase::Idle,
            board: Board::empty(),
            score: 0,
            best_score: 0,
            currency: 0,
            highest_level_reached,
            history,
            pending: None,
        }
    }

    /// Seeds the wallet from persisted data.
    pub fn with_wallet(mut self, currency: u64, best_score: u64) -> Self {
        self.currency = currency;
        self.best_score = best_score;
        self
    }

    // ===== accessors =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    pub fn highest_level_reached(&self) -> u32 {
        self.highest_level_reached
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn game_seed(&self) -> u64 {
        self.game_seed
    }

    /// The resolved move waiting for [`GameSession::settle`], if any.
    pub fn pending(&self) -> Option<&MoveOutcome> {
        self.pending.as_ref()
    }

    // ===== lifecycle =====

    /// Deals a fresh board: clears score, history and the level-up gate, then
    /// spawns the opening tiles. Currency and best score carry over.
    ///
    /// Also used for restart, so it is accepted in every phase and discards
    /// any unsettled move.
    pub fn start(&mut self) -> Vec<Spawn> {
        self.pending = None;
        self.board = Board::empty();
        self.score = 0;
        self.highest_level_reached = self.config.celebration_level;
        self.history.clear();

        let spawns = (0..GameConfig::INITIAL_TILES)
            .filter_map(|_| self.spawn())
            .collect();
        self.phase = SessionPhase::AwaitingInput;
        spawns
    }

    /// Abandons the current game and deals a new one. Same as [`start`].
    ///
    /// [`start`]: GameSession::start
    pub fn restart(&mut self) -> Vec<Spawn> {
        self.start()
    }

    /// Resumes a persisted game. An empty board starts a fresh one instead.
    pub fn restore(&mut self, snapshot: GameSnapshot) {
        if snapshot.grid.occupied_count() == 0 {
            self.start();
            return;
        }

        self.pending = None;
        self.board = snapshot.grid;
        self.score = snapshot.score;
        self.best_score = self.best_score.max(snapshot.score);
        self.highest_level_reached = snapshot
            .highest_level_reached
            .max(self.config.celebration_level);
        self.history = History::from_entries(self.config.history_capacity, snapshot.history);
        self.phase = self.resting_phase();
    }

    /// Persistable copy of the current game.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            highest_level_reached: self.highest_level_reached,
            grid: self.board.snapshot(),
            history: self.history.iter().cloned().collect(),
        }
    }

    // ===== moves =====

    /// Resolves a move without applying it.
    ///
    /// When tiles move, the session enters [`SessionPhase::Resolving`] and
    /// refuses further input until [`GameSession::settle`]. A move that
    /// changes nothing leaves the board untouched but still re-checks for a
    /// stalemate.
    pub fn begin_move(&mut self, direction: Direction) -> Result<MoveOutcome, SessionError> {
        if !self.phase.accepts_moves() {
            return Err(SessionError::NotAcceptingInput { phase: self.phase });
        }

        let outcome = resolve(&self.board, direction);
        if outcome.moved {
            self.phase = SessionPhase::Resolving;
            self.pending = Some(outcome.clone());
        } else {
            self.phase = self.resting_phase();
        }
        Ok(outcome)
    }

    /// Applies the pending move: mutates the board, credits score and
    /// currency, records the pre-move snapshot, spawns one tile and checks
    /// for game over.
    pub fn settle(&mut self) -> Result<SettleReport, SessionError> {
        let outcome = self.pending.take().ok_or(SessionError::NothingToSettle)?;
        self.phase = SessionPhase::Settling;

        let before = self.history_snapshot();

        self.board.apply_actions(&outcome.actions);
        debug_assert_eq!(self.board, outcome.board, "replayed board diverged from resolver");

        self.add_score(outcome.score_delta);
        self.currency = self.currency.saturating_add(outcome.reward);

        let mut level_up = None;
        for tile in outcome.merged_tiles() {
            level_up = self.track_level(tile).or(level_up);
        }

        let spawn = self.spawn();
        if let Some(spawn) = spawn {
            level_up = self.track_level(spawn.tile).or(level_up);
        }

        self.history.push(before);
        self.phase = self.resting_phase();

        Ok(SettleReport {
            outcome,
            spawn,
            level_up,
            board: self.board,
            score: self.score,
            currency: self.currency,
            phase: self.phase,
        })
    }

    /// Resolves and settles a move in one step.
    pub fn play(&mut self, direction: Direction) -> Result<SettleReport, SessionError> {
        let outcome = self.begin_move(direction)?;
        if outcome.moved {
            return self.settle();
        }

        Ok(SettleReport {
            outcome,
            spawn: None,
            level_up: None,
            board: self.board,
            score: self.score,
            currency: self.currency,
            phase: self.phase,
        })
    }

    // ===== special actions =====

    /// Restores the most recent snapshot for a fee.
    pub fn undo(&mut self) -> Result<SpecialReport, SessionError> {
        self.ensure_special_allowed()?;
        let price = self.config.undo_price;
        self.ensure_funds(price)?;

        let previous = self.history.pop().ok_or(SessionError::HistoryEmpty)?;
        self.currency -= price;
        self.score = previous.score;
        self.highest_level_reached = previous.highest_level_reached;
        self.board = previous.grid;
        self.phase = self.resting_phase();

        Ok(self.special_report(SpecialKind::Undo, price))
    }

    /// Removes one tile for a fee. Refused when it is the last tile.
    ///
    /// Always leaves a free cell, so it also lifts a game over.
    pub fn destroy(&mut self, position: Position) -> Result<SpecialReport, SessionError> {
        self.ensure_special_allowed()?;
        let tile = self
            .board
            .get(position)
            .ok_or(SessionError::EmptyCell(position))?;
        if self.board.occupied_count() <= 1 {
            return Err(SessionError::LastTile);
        }
        let price = self.config.destroy_price;
        self.ensure_funds(price)?;

        let before = self.history_snapshot();
        self.history.push(before);
        self.board.take(position);
        self.currency -= price;
        self.phase = self.resting_phase();

        Ok(self.special_report(SpecialKind::Destroy { position, tile }, price))
    }

    /// Exchanges two tiles for a fee.
    ///
    /// Does not free a cell, so the phase is left as it was even when the
    /// swap lines up a pair on a finished board.
    pub fn swap(&mut self, first: Position, second: Position) -> Result<SpecialReport, SessionError> {
        self.ensure_special_allowed()?;
        if first == second {
            return Err(SessionError::SameCell(first));
        }
        let a = self.board.get(first).ok_or(SessionError::EmptyCell(first))?;
        let b = self
            .board
            .get(second)
            .ok_or(SessionError::EmptyCell(second))?;
        let price = self.config.swap_price;
        self.ensure_funds(price)?;

        let before = self.history_snapshot();
        self.history.push(before);
        self.board.set(first, Some(b));
        self.board.set(second, Some(a));
        self.currency -= price;

        Ok(self.special_report(SpecialKind::Swap { first, second }, price))
    }

    /// Credits currency granted from outside the game (e.g. a watched ad).
    /// Accepted in every phase. Returns the new balance.
    pub fn grant_reward(&mut self, amount: u64) -> u64 {
        self.currency = self.currency.saturating_add(amount);
        self.currency
    }

    // ===== helpers =====

    fn resting_phase(&self) -> SessionPhase {
        if self.board.is_terminal() {
            SessionPhase::GameOver
        } else {
            SessionPhase::AwaitingInput
        }
    }

    fn history_snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            score: self.score,
            highest_level_reached: self.highest_level_reached,
            grid: self.board.snapshot(),
        }
    }

    fn spawn(&mut self) -> Option<Spawn> {
        let spawn = spawn_tile(
            &self.board,
            &self.rng,
            &self.config,
            self.game_seed,
            self.nonce,
        )?;
        self.board.set(spawn.position, Some(spawn.tile));
        self.nonce += 1;
        Some(spawn)
    }

    fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
    }

    /// Raises the level-up gate if `tile` beats it. Returns the new level.
    fn track_level(&mut self, tile: Tile) -> Option<u32> {
        let level = tile.level();
        if level >= self.config.celebration_level && level > self.highest_level_reached {
            self.highest_level_reached = level;
            Some(level)
        } else {
            None
        }
    }

    fn ensure_special_allowed(&self) -> Result<(), SessionError> {
        if self.phase.accepts_special_actions() {
            Ok(())
        } else {
            Err(SessionError::NotAcceptingInput { phase: self.phase })
        }
    }

    fn ensure_funds(&self, required: u64) -> Result<(), SessionError> {
        if self.currency < required {
            return Err(SessionError::InsufficientFunds {
                required,
                available: self.currency,
            });
        }
        Ok(())
    }

    fn special_report(&self, kind: SpecialKind, charged: u64) -> SpecialReport {
        SpecialReport {
            kind,
            charged,
            board: self.board,
            score: self.score,
            currency: self.currency,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = GameConfig::BOARD_SIZE;

    fn session_with(values: [[u32; N]; N], currency: u64) -> GameSession {
        let mut session = GameSession::new(GameConfig::default(), 42).with_wallet(currency, 0);
        let board = Board::from_values(values).unwrap();
        session.restore(GameSnapshot::from_board(board, 4));
        session
    }

    const CHECKERBOARD: [[u32; N]; N] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    #[test]
    fn new_session_is_idle_until_started() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(matches!(
            session.begin_move(Direction::Left),
            Err(SessionError::NotAcceptingInput {
                phase: SessionPhase::Idle
            })
        ));

        let spawns = session.start();
        assert_eq!(spawns.len(), 2);
        assert_eq!(session.board().occupied_count(), 2);
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
    }

    #[test]
    fn resolving_blocks_new_moves_until_settled() {
        let mut session = session_with([[2, 2, 0, 0], [0; N], [0; N], [0; N]], 0);

        let outcome = session.begin_move(Direction::Left).unwrap();
        assert!(outcome.moved);
        assert_eq!(session.phase(), SessionPhase::Resolving);
        assert!(session.begin_move(Direction::Right).is_err());
        assert!(session.undo().is_err());

        let report = session.settle().unwrap();
        assert_eq!(report.phase, SessionPhase::AwaitingInput);
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
    }

    #[test]
    fn settle_merges_scores_rewards_and_spawns() {
        let mut session = session_with([[2, 2, 0, 0], [0; N], [0; N], [0; N]], 0);

        let report = session.play(Direction::Left).unwrap();

        assert_eq!(report.outcome.merges, 1);
        assert_eq!(report.score, 4);
        assert_eq!(session.best_score(), 4);
        assert_eq!(report.currency, 1);
        let spawn = report.spawn.unwrap();
        assert_ne!(spawn.position, Position::ORIGIN);
        assert_eq!(session.board().get(Position::ORIGIN), Some(Tile::FOUR));
        assert_eq!(session.board().occupied_count(), 2);
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.history().peek().map(|s| s.grid.to_values()[0]),
            Some([2, 2, 0, 0])
        );
    }

    #[test]
    fn noop_move_changes_nothing() {
        let mut session = session_with([[2, 4, 0, 0], [0; N], [0; N], [0; N]], 0);
        let before = *session.board();

        let report = session.play(Direction::Left).unwrap();

        assert!(!report.outcome.moved);
        assert!(report.spawn.is_none());
        assert_eq!(*session.board(), before);
        assert!(session.history().is_empty());
        assert!(matches!(session.settle(), Err(SessionError::NothingToSettle)));
    }

    #[test]
    fn terminal_board_restores_into_game_over() {
        let mut session = session_with(CHECKERBOARD, 0);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(session.begin_move(Direction::Up).is_err());
    }

    #[test]
    fn last_spawn_can_end_the_game() {
        // Moving right only slides the bottom row; the spawn refills (3, 0)
        // and the board locks whenever it rolls a 4.
        let values = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [8, 16, 0, 32]];
        let mut found = false;
        for seed in 0..200 {
            let mut session = GameSession::new(GameConfig::default(), seed);
            session.restore(GameSnapshot::from_board(Board::from_values(values).unwrap(), 4));
            let report = session.play(Direction::Right).unwrap();
            assert!(report.outcome.moved);
            if report.is_game_over() {
                found = true;
                assert_eq!(session.phase(), SessionPhase::GameOver);
                break;
            }
        }
        assert!(found, "no seed produced a stalemate");
    }

    #[test]
    fn undo_restores_previous_state_for_a_fee() {
        let mut session = session_with([[2, 2, 0, 0], [0; N], [0; N], [0; N]], 200);
        session.play(Direction::Left).unwrap();

        let report = session.undo().unwrap();

        assert_eq!(report.charged, 110);
        assert_eq!(session.currency(), 200 + 1 - 110);
        assert_eq!(session.score(), 0);
        assert_eq!(session.board().to_values()[0], [2, 2, 0, 0]);
        assert_eq!(session.board().occupied_count(), 2);
        assert!(session.history().is_empty());
    }

    #[test]
    fn undo_fails_without_funds_or_history() {
        let mut broke = session_with([[2, 2, 0, 0], [0; N], [0; N], [0; N]], 0);
        broke.play(Direction::Left).unwrap();
        assert_eq!(
            broke.undo(),
            Err(SessionError::InsufficientFunds {
                required: 110,
                available: 1
            })
        );
        assert_eq!(broke.history().len(), 1);

        let mut fresh = session_with([[2, 0, 0, 0], [0; N], [0; N], [0; N]], 500);
        assert_eq!(fresh.undo(), Err(SessionError::HistoryEmpty));
        assert_eq!(fresh.currency(), 500);
    }

    #[test]
    fn undo_leaves_game_over() {
        let open = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]];
        let mut session = GameSession::new(GameConfig::default(), 3).with_wallet(110, 0);
        session.restore(GameSnapshot {
            score: 12,
            highest_level_reached: 4,
            grid: Board::from_values(CHECKERBOARD).unwrap(),
            history: vec![HistorySnapshot {
                score: 8,
                highest_level_reached: 4,
                grid: Board::from_values(open).unwrap(),
            }],
        });
        assert_eq!(session.phase(), SessionPhase::GameOver);

        session.undo().unwrap();

        assert_eq!(session.board().to_values(), open);
        assert_eq!(session.score(), 8);
        assert_eq!(session.currency(), 0);
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
    }

    #[test]
    fn destroy_frees_a_cell_and_exits_game_over() {
        let mut session = session_with(CHECKERBOARD, 150);

        let report = session.destroy(Position::new(1, 1)).unwrap();

        assert_eq!(
            report.kind,
            SpecialKind::Destroy {
                position: Position::new(1, 1),
                tile: Tile::TWO
            }
        );
        assert_eq!(session.currency(), 50);
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.board().get(Position::new(1, 1)), None);
    }

    #[test]
    fn destroy_rejects_empty_cells_and_the_last_tile() {
        let mut session = session_with([[2, 0, 0, 0], [0; N], [0; N], [0; N]], 500);
        assert_eq!(
            session.destroy(Position::new(2, 2)),
            Err(SessionError::EmptyCell(Position::new(2, 2)))
        );
        assert_eq!(session.destroy(Position::ORIGIN), Err(SessionError::LastTile));
        assert_eq!(session.currency(), 500);
        assert!(session.history().is_empty());
    }

    #[test]
    fn swap_exchanges_tiles_but_keeps_game_over() {
        let mut session = session_with(CHECKERBOARD, 120);

        session
            .swap(Position::new(0, 0), Position::new(0, 1))
            .unwrap();

        assert_eq!(session.board().to_values()[0], [4, 2, 2, 4]);
        assert_eq!(session.currency(), 0);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn swap_needs_two_distinct_tiles() {
        let mut session = session_with([[2, 4, 0, 0], [0; N], [0; N], [0; N]], 500);
        assert_eq!(
            session.swap(Position::ORIGIN, Position::ORIGIN),
            Err(SessionError::SameCell(Position::ORIGIN))
        );
        assert_eq!(
            session.swap(Position::ORIGIN, Position::new(3, 3)),
            Err(SessionError::EmptyCell(Position::new(3, 3)))
        );
        assert_eq!(session.currency(), 500);
    }

    #[test]
    fn level_up_fires_once_per_new_level() {
        let mut session = session_with([[16, 16, 0, 0], [0; N], [0; N], [0; N]], 0);

        let report = session.play(Direction::Left).unwrap();
        assert_eq!(report.level_up, Some(5));
        assert_eq!(session.highest_level_reached(), 5);
    }

    #[test]
    fn levels_below_threshold_do_not_celebrate() {
        let mut session = session_with([[4, 4, 0, 0], [0; N], [0; N], [0; N]], 0);
        let report = session.play(Direction::Left).unwrap();
        assert_eq!(report.level_up, None);
        assert_eq!(session.highest_level_reached(), 4);
    }

    #[test]
    fn history_is_bounded() {
        let mut session = GameSession::new(GameConfig::default(), 9).with_wallet(10_000, 0);
        session.start();
        let mut settled = 0;
        for direction in Direction::ALL.iter().cycle().take(200) {
            if session.phase() == SessionPhase::GameOver {
                break;
            }
            if session.play(*direction).unwrap().outcome.moved {
                settled += 1;
            }
        }
        assert!(settled > 10);
        assert_eq!(session.history().len(), 10);
    }

    #[test]
    fn restart_keeps_wallet_and_best_score() {
        let mut session = session_with([[2, 2, 0, 0], [0; N], [0; N], [0; N]], 300);
        session.play(Direction::Left).unwrap();

        session.restart();

        assert_eq!(session.score(), 0);
        assert_eq!(session.best_score(), 4);
        assert_eq!(session.currency(), 301);
        assert!(session.history().is_empty());
        assert_eq!(session.board().occupied_count(), 2);
    }

    #[test]
    fn snapshot_round_trips_through_restore() {
        let mut session = session_with([[2, 2, 8, 0], [0; N], [0, 4, 0, 0], [0; N]], 0);
        session.play(Direction::Left).unwrap();
        let snapshot = session.snapshot();

        let mut resumed = GameSession::new(GameConfig::default(), 7);
        resumed.restore(snapshot.clone());

        assert_eq!(resumed.snapshot(), snapshot);
        assert_eq!(resumed.phase(), SessionPhase::AwaitingInput);
    }

    #[test]
    fn grant_reward_works_in_any_phase() {
        let mut session = session_with(CHECKERBOARD, 0);
        assert_eq!(session.grant_reward(115), 115);
    }

    #[test]
    fn huge_saved_totals_saturate_instead_of_overflowing() {
        let mut session =
            GameSession::new(GameConfig::default(), 5).with_wallet(u64::MAX, u64::MAX - 1);
        session.restore(GameSnapshot {
            score: u64::MAX - 1,
            highest_level_reached: 4,
            grid: Board::from_values([[2, 2, 0, 0], [0; N], [0; N], [0; N]]).unwrap(),
            history: Vec::new(),
        });

        let report = session.play(Direction::Left).unwrap();

        assert_eq!(report.outcome.merges, 1);
        assert_eq!(session.score(), u64::MAX);
        assert_eq!(session.best_score(), u64::MAX);
        assert_eq!(session.currency(), u64::MAX);
    }

    #[test]
    fn history_depth_follows_config() {
        let config = GameConfig::free_actions().with_history_capacity(2);
        let mut session = GameSession::new(config, 9);
        session.restore(GameSnapshot::from_board(Board::from_values(CHECKERBOARD).unwrap(), 4));

        for col in 0..3 {
            let report = session.destroy(Position::new(0, col)).unwrap();
            assert_eq!(report.charged, 0);
        }

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.currency(), 0);
        // The oldest entry (the full board) was dropped.
        let oldest = session.history().iter().next().unwrap();
        assert_eq!(oldest.grid.occupied_count(), GameConfig::CELL_COUNT - 1);
    }
}
