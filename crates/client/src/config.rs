//! Client configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::{FileSaveRepository, RuntimeConfig};

/// Configuration required to bootstrap the runtime from the terminal.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub save_data_dir: Option<PathBuf>,
    pub settle_delay: Option<Duration>,
    pub save_debounce: Option<Duration>,
    pub leaderboard_cooldown: Option<Duration>,
    pub game_seed: Option<u64>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SAVE_DATA_DIR` - Directory for the save file (default: platform-specific)
    /// - `SETTLE_DELAY_MS` - Slide animation length (default: 150)
    /// - `SAVE_DEBOUNCE_MS` - Save coalescing window (default: 2000)
    /// - `LEADERBOARD_COOLDOWN_SECS` - Minimum gap between score submissions (default: 60)
    /// - `GAME_SEED` - Fixed spawn seed for reproducible games (default: random)
    pub fn from_env() -> Self {
        Self {
            save_data_dir: env::var("SAVE_DATA_DIR").ok().map(PathBuf::from),
            settle_delay: read_env::<u64>("SETTLE_DELAY_MS").map(Duration::from_millis),
            save_debounce: read_env::<u64>("SAVE_DEBOUNCE_MS").map(Duration::from_millis),
            leaderboard_cooldown: read_env::<u64>("LEADERBOARD_COOLDOWN_SECS")
                .map(Duration::from_secs),
            game_seed: read_env::<u64>("GAME_SEED"),
        }
    }

    pub fn save_dir(&self) -> PathBuf {
        self.save_data_dir
            .clone()
            .unwrap_or_else(FileSaveRepository::default_dir)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            game_seed: self.game_seed,
            settle_delay: self.settle_delay.unwrap_or(defaults.settle_delay),
            save_debounce: self.save_debounce.unwrap_or(defaults.save_debounce),
            leaderboard_cooldown: self
                .leaderboard_cooldown
                .unwrap_or(defaults.leaderboard_cooldown),
            ..defaults
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_fall_back_to_runtime_defaults() {
        let config = ClientConfig::default().runtime_config();
        assert_eq!(config.settle_delay, RuntimeConfig::DEFAULT_SETTLE_DELAY);
        assert_eq!(config.save_debounce, RuntimeConfig::DEFAULT_SAVE_DEBOUNCE);
        assert_eq!(config.game_seed, None);
    }

    #[test]
    fn overrides_reach_the_runtime() {
        let config = ClientConfig {
            settle_delay: Some(Duration::ZERO),
            leaderboard_cooldown: Some(Duration::from_secs(5)),
            game_seed: Some(42),
            ..ClientConfig::default()
        }
        .runtime_config();
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.leaderboard_cooldown, Duration::from_secs(5));
        assert_eq!(config.game_seed, Some(42));
    }
}
