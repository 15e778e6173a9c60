//! Repository contracts for saving and loading player progress.

use super::error::Result;
use super::types::SaveData;

/// Storage for the single save slot of a player.
///
/// Implementations are synchronous; the persistence worker decides when to
/// call them.
pub trait SaveRepository: Send + Sync {
    /// Returns the stored save, or `None` if the player has never saved.
    fn load_state(&self) -> Result<Option<SaveData>>;

    /// Replaces the stored save.
    fn save_state(&self, data: &SaveData) -> Result<()>;
}
