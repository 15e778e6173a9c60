//! Repository layer for player progress.
//!
//! A single save slot holds the wallet, the best score and the game in
//! progress. The persistence worker owns all writes; repositories only know
//! how to read and replace the slot.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepo;
pub use traits::SaveRepository;
pub use types::SaveData;
