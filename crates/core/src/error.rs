//! Error types for the IntentGate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the classifier converts
//! inference and schema failures into `UNKNOWN` actions, the gateway turns
//! quota failures into HTTP 429.

use crate::action::ActionKind;
use std::time::Duration;
use thiserror::Error;

/// Top-level error for startup and wiring paths.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Why an external inference call did not yield a usable action.
///
/// Each variant names the stage that failed. None of them ever escapes the
/// classifier: they are folded into an annotated `UNKNOWN` action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Inference provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Inference request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The provider's response body is logged where it is received and never
    /// carried here: this message reaches HTTP clients.
    #[error("Inference service error (status: {status_code})")]
    Status { status_code: u16 },

    #[error("Failed to parse response: {0}")]
    MalformedReply(String),

    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaViolation),
}

/// A syntactically valid reply that does not fit the action schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("reply is not an action object: {0}")]
    NotAnAction(String),

    #[error("unknown action kind '{0}'")]
    UnknownKind(String),

    #[error("{0} reply has no params object")]
    MissingParams(ActionKind),

    #[error("invalid params for {kind}: {reason}")]
    InvalidParams { kind: ActionKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuotaError {
    #[error("Daily limit of {limit} requests exceeded")]
    Exceeded { limit: u32 },
}
