//! Classifier orchestrator.
//!
//! The mode is picked once, when the classifier is built: either every
//! command goes to the external delegate, or every command goes to the rule
//! table. A failed delegate call is *not* retried against the rules; it
//! yields `UNKNOWN` annotated with the failure, so callers never need to
//! tell "provider failed" apart from "nothing matched".

use intentgate_core::{Action, InferenceDelegate, InferenceError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::rules::RuleClassifier;

enum Mode {
    Inference {
        delegate: Arc<dyn InferenceDelegate>,
        timeout: Duration,
    },
    Rules(RuleClassifier),
}

/// Resolves free text to an [`Action`] using the mode chosen at startup.
pub struct Classifier {
    mode: Mode,
}

impl Classifier {
    /// Default upper bound on one delegate call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Offline mode: rule table only.
    pub fn rules() -> Self {
        Self {
            mode: Mode::Rules(RuleClassifier::new()),
        }
    }

    /// Delegate mode, each call bounded by `timeout`.
    pub fn inference(delegate: Arc<dyn InferenceDelegate>, timeout: Duration) -> Self {
        Self {
            mode: Mode::Inference { delegate, timeout },
        }
    }

    /// Delegate mode when one is available, rules otherwise.
    pub fn from_delegate(delegate: Option<Arc<dyn InferenceDelegate>>, timeout: Duration) -> Self {
        match delegate {
            Some(delegate) => Self::inference(delegate, timeout),
            None => Self::rules(),
        }
    }

    /// "rules", or the delegate's name.
    pub fn mode_name(&self) -> &str {
        match &self.mode {
            Mode::Inference { delegate, .. } => delegate.name(),
            Mode::Rules(_) => "rules",
        }
    }

    pub fn uses_inference(&self) -> bool {
        matches!(self.mode, Mode::Inference { .. })
    }

    /// Classify `text`. Always returns a well-formed action.
    pub async fn resolve(&self, text: &str) -> Action {
        match &self.mode {
            Mode::Rules(rules) => rules.classify(text),
            Mode::Inference { delegate, timeout } => {
                match infer_bounded(delegate.as_ref(), *timeout, text).await {
                    Ok(action) => {
                        debug!(delegate = delegate.name(), kind = %action.kind(), "Delegate classified command");
                        action
                    }
                    Err(e) => {
                        warn!(delegate = delegate.name(), error = %e, "Delegate failed, answering UNKNOWN");
                        Action::unknown_with_error(e.to_string())
                    }
                }
            }
        }
    }
}

async fn infer_bounded(
    delegate: &dyn InferenceDelegate,
    timeout: Duration,
    text: &str,
) -> Result<Action, InferenceError> {
    match tokio::time::timeout(timeout, delegate.infer(text)).await {
        Ok(result) => result,
        Err(_) => Err(InferenceError::Timeout { after: timeout }),
    }
}
