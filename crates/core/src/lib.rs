//! # IntentGate Core
//!
//! Domain types, traits, and error definitions shared by every IntentGate
//! crate. This crate has **no framework dependencies**: it defines the
//! closed action schema that the classifier produces and the gateway
//! returns, plus the seam through which an external inference provider is
//! plugged in.
//!
//! ## Layout
//!
//! - [`action`]: the eleven action kinds and their parameter shapes
//! - [`delegate`]: the [`InferenceDelegate`] trait
//! - [`error`]: the error taxonomy (inference, schema, quota, startup)

pub mod action;
pub mod delegate;
pub mod error;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionKind, RawAction};
pub use delegate::InferenceDelegate;
pub use error::{Error, InferenceError, QuotaError, Result, SchemaViolation};
