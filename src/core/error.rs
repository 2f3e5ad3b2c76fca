//! Dispatch failures and the shared error slot.

use thiserror::Error;

use crate::core::Mode;

/// Why a submission did not produce a result.
///
/// Every variant is handled the same way at the session boundary: the
/// error channel is set and stored results are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A precondition failed before anything was sent.
    #[error("{0}")]
    Validation(String),
    /// The request could not be sent or no response arrived.
    #[error("could not reach the classification service: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {detail}")]
    Service { status: u16, detail: String },
    /// The service answered with a body that does not match the schema.
    #[error("unexpected response from the service: {0}")]
    Parse(String),
}

/// Coarse category of a [`DispatchError`], kept alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Service,
    Parse,
}

impl ErrorKind {
    /// Returns the short label shown next to the error text.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid input",
            Self::Network => "Network error",
            Self::Service => "Service error",
            Self::Parse => "Bad response",
        }
    }
}

impl DispatchError {
    /// Builds the error raised when a file-based mode has no file selected.
    #[must_use]
    pub fn missing_file(mode: Mode) -> Self {
        Self::Validation(format!(
            "select a file before starting {}",
            mode.action().to_ascii_lowercase()
        ))
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Service { .. } => ErrorKind::Service,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Returns the message shown to the operator for a failure in `mode`.
    #[must_use]
    pub fn user_message(&self, mode: Mode) -> String {
        match self {
            Self::Validation(reason) => format!("{}: {reason}", mode.action()),
            other => format!("{} failed: {other}", mode.action()),
        }
    }
}

/// The error currently shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub mode: Mode,
    pub kind: ErrorKind,
    pub text: String,
}

impl ErrorMessage {
    #[must_use]
    pub fn from_dispatch(mode: Mode, error: &DispatchError) -> Self {
        Self {
            mode,
            kind: error.kind(),
            text: error.user_message(mode),
        }
    }
}

/// Single shared slot holding the last user-visible error.
///
/// Last write wins. The session is its only writer: it sets the slot on
/// any failure and clears it on the next success of any mode.
#[derive(Debug, Clone, Default)]
pub struct ErrorChannel {
    current: Option<ErrorMessage>,
}

impl ErrorChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, message: ErrorMessage) {
        self.current = Some(message);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&ErrorMessage> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}
