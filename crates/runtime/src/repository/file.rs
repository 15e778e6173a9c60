//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{RepositoryError, Result};
use super::traits::SaveRepository;
use super::types::SaveData;

const SAVE_FILE: &str = "save.json";

/// Stores the save slot as pretty-printed JSON in `{base_dir}/save.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    /// Creates the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Platform data directory for the game.
    ///
    /// - macOS: `~/Library/Application Support/grid-merge`
    /// - Linux: `~/.local/share/grid-merge` (or `$XDG_DATA_HOME/grid-merge`)
    /// - Windows: `%APPDATA%\grid-merge`
    /// - Fallback: `./save_data`
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "grid-merge")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./save_data"))
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(SAVE_FILE)
    }
}

impl SaveRepository for FileSaveRepository {
    fn load_state(&self) -> Result<Option<SaveData>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let data = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::CorruptedData(format!("{}: {e}", path.display())))?;

        tracing::debug!("Loaded save from {}", path.display());
        Ok(Some(data))
    }

    fn save_state(&self, data: &SaveData) -> Result<()> {
        let path = self.path();
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(data)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved progress to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Board, GameSnapshot};

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        assert!(repo.load_state().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_the_same_progress() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path().join("nested")).unwrap();
        let grid = Board::from_values([[2, 0, 0, 0], [0, 4, 0, 0], [0; 4], [0, 0, 0, 8]]).unwrap();
        let data = SaveData {
            currency: 400,
            best_score: 12,
            has_entered_before: true,
            current_game: Some(GameSnapshot::from_board(grid, 4)),
            saved_at: None,
        }
        .stamped();

        repo.save_state(&data).unwrap();

        assert_eq!(repo.load_state().unwrap(), Some(data));
        assert!(!repo.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn garbage_is_reported_as_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        fs::write(repo.path(), b"{not json").unwrap();
        assert!(matches!(
            repo.load_state(),
            Err(RepositoryError::CorruptedData(_))
        ));
    }
}
