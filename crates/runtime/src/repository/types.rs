//! Persisted save schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::GameSnapshot;

/// Everything kept between launches.
///
/// Serialised as camelCase JSON:
///
/// ```json
/// {
///   "currency": 515,
///   "bestScore": 1024,
///   "hasEnteredBefore": true,
///   "currentGame": {
///     "score": 88,
///     "highestLevelReached": 5,
///     "grid": [[{"value": 2}, null, null, null], ...],
///     "history": [...]
///   },
///   "savedAt": "2024-05-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub currency: u64,
    #[serde(default)]
    pub best_score: u64,
    #[serde(default)]
    pub has_entered_before: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_game: Option<GameSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveData {
    /// Stamps the save with the current wall-clock time.
    pub fn stamped(mut self) -> Self {
        self.saved_at = Some(Utc::now());
        self
    }
}
