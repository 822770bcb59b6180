//! Worker tasks that back the runtime orchestration.
//!
//! The session worker executes combat commands; the autosave worker
//! persists committed state in the background.

mod autosave;
mod session;

pub use autosave::AutosaveWorker;
pub use session::{Command, SessionWorker};
