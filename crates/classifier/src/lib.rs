//! Intent classification for IntentGate.
//!
//! Two ways to turn a free-text command into an [`Action`]:
//!
//! - [`RuleClassifier`]: an ordered keyword table, deterministic and offline
//! - an [`InferenceDelegate`] wrapping an external model
//!
//! [`Classifier`] picks one of them once, at construction, and always hands
//! back a well-formed action. Delegate failures come back as annotated
//! `UNKNOWN` actions, never as errors.
//!
//! [`Action`]: intentgate_core::Action
//! [`InferenceDelegate`]: intentgate_core::InferenceDelegate

pub mod resolver;
pub mod rules;

pub use resolver::Classifier;
pub use rules::{RuleClassifier, RuleMatch};
