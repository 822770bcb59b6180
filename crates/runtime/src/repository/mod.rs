//! Snapshot persistence behind an async repository trait.
//!
//! [`FileStateRepository`] is the production store (one JSON file per
//! revision, atomic renames); [`InMemoryStateRepository`] backs tests.

mod file;
mod memory;
mod traits;

pub use file::FileStateRepository;
pub use memory::InMemoryStateRepository;
pub use traits::{PersistenceError, StateRepository};
