//! Common error infrastructure for combat-core.
//!
//! Every action error implements [`CombatError`] so hosts can log a stable
//! code and pick a severity without matching on concrete types.

use std::fmt;

use crate::state::TokenId;

/// Severity level of an error, used for logging priority and recovery
/// decisions at the host boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Transient; retrying or re-reading state may succeed.
    Recoverable,
    /// The request was malformed or out of order; the session is fine.
    Validation,
    /// A bug inside the engine or its wiring.
    Internal,
    /// The session can no longer make progress without a reset.
    Fatal,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Recoverable => "recoverable",
            ErrorSeverity::Validation => "validation",
            ErrorSeverity::Internal => "internal",
            ErrorSeverity::Fatal => "fatal",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorSeverity::Recoverable | ErrorSeverity::Validation)
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured context attached to an error for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Token the failing request referred to, when known.
    pub token_id: Option<TokenId>,
    /// Action nonce at the time of the failure.
    pub nonce: Option<u64>,
    /// Short static hint for log lines.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(mut self, token_id: TokenId) -> Self {
        self.token_id = Some(token_id);
        self
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: fmt::Debug + fmt::Display {
    /// Severity classification for logging and recovery.
    fn severity(&self) -> ErrorSeverity;

    /// Structured context, when the error carries any.
    fn context(&self) -> Option<ErrorContext> {
        None
    }

    /// Stable identifier for matching in logs.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Error type for actions that cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeverError {}

impl fmt::Display for NeverError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for NeverError {}

impl CombatError for NeverError {
    fn severity(&self) -> ErrorSeverity {
        match *self {}
    }
}
