//! Types downstream clients interact with.

mod errors;
mod handle;

pub use errors::{PersistenceError, Result, RuntimeError};
pub use handle::RuntimeHandle;
