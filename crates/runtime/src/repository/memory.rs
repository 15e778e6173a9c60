//! In-memory SaveRepository implementation for tests and local runs.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::{RepositoryError, Result};
use super::traits::SaveRepository;
use super::types::SaveData;

/// Keeps the save slot in memory and counts successful writes.
#[derive(Debug, Default)]
pub struct InMemorySaveRepo {
    slot: RwLock<Option<SaveData>>,
    writes: AtomicUsize,
}

impl InMemorySaveRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing save in the slot.
    pub fn with_save(data: SaveData) -> Self {
        Self {
            slot: RwLock::new(Some(data)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save_state` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SaveRepository for InMemorySaveRepo {
    fn load_state(&self) -> Result<Option<SaveData>> {
        let slot = self.slot.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn save_state(&self, data: &SaveData) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(data.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_repo_loads_nothing() {
        let repo = InMemorySaveRepo::new();
        assert_eq!(repo.load_state().unwrap(), None);
    }

    #[test]
    fn save_replaces_the_slot() {
        let repo = InMemorySaveRepo::new();
        for currency in [10, 20] {
            repo.save_state(&SaveData {
                currency,
                ..SaveData::default()
            })
            .unwrap();
        }
        assert_eq!(repo.load_state().unwrap().map(|d| d.currency), Some(20));
        assert_eq!(repo.write_count(), 2);
    }
}
