/// Game configuration constants and tunable parameters.
///
/// The board size is a compile-time constant because it sizes fixed arrays.
/// History depth, prices and odds are runtime-tunable so a host can
/// rebalance the economy without touching the rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Number of history snapshots retained for undo.
    pub history_capacity: usize,
    /// Chance (out of 100) that a spawned tile is a 2 rather than a 4.
    pub spawn_two_percent: u32,
    /// Currency charged for restoring the previous snapshot.
    pub undo_price: u64,
    /// Currency charged for removing one tile.
    pub destroy_price: u64,
    /// Currency charged for exchanging two tiles.
    pub swap_price: u64,
    /// Currency granted the first time a player ever enters the game.
    pub welcome_bonus: u64,
    /// Currency granted for a completed rewarded advertisement.
    pub ad_reward: u64,
    /// Level from which level-up celebrations start firing.
    pub celebration_level: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Width and height of the square board.
    pub const BOARD_SIZE: usize = 4;
    /// Total number of cells on the board.
    pub const CELL_COUNT: usize = Self::BOARD_SIZE * Self::BOARD_SIZE;
    /// Tiles placed on a freshly started board.
    pub const INITIAL_TILES: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
    pub const DEFAULT_SPAWN_TWO_PERCENT: u32 = 90;
    pub const DEFAULT_UNDO_PRICE: u64 = 110;
    pub const DEFAULT_DESTROY_PRICE: u64 = 100;
    pub const DEFAULT_SWAP_PRICE: u64 = 120;
    pub const DEFAULT_WELCOME_BONUS: u64 = 400;
    pub const DEFAULT_AD_REWARD: u64 = 115;
    pub const DEFAULT_CELEBRATION_LEVEL: u32 = 4;

    pub fn new() -> Self {
        Self {
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            spawn_two_percent: Self::DEFAULT_SPAWN_TWO_PERCENT,
            undo_price: Self::DEFAULT_UNDO_PRICE,
            destroy_price: Self::DEFAULT_DESTROY_PRICE,
            swap_price: Self::DEFAULT_SWAP_PRICE,
            welcome_bonus: Self::DEFAULT_WELCOME_BONUS,
            ad_reward: Self::DEFAULT_AD_REWARD,
            celebration_level: Self::DEFAULT_CELEBRATION_LEVEL,
        }
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity.max(1);
        self
    }

    /// Returns a configuration where every special action is free.
    ///
    /// Handy for tests and sandbox modes.
    pub fn free_actions() -> Self {
        Self {
            undo_price: 0,
            destroy_price: 0,
            swap_price: 0,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
