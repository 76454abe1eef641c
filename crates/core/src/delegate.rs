//! InferenceDelegate trait — the seam for an external intent provider.
//!
//! A delegate forwards the raw prompt to some external model and turns its
//! reply into a typed [`Action`]. The classifier treats it as a black box:
//! it either gets a schema-valid action or an [`InferenceError`] naming the
//! stage that failed.
//!
//! Implementations: OpenRouter (any OpenAI-compatible endpoint), test doubles.

use async_trait::async_trait;

use crate::action::Action;
use crate::error::InferenceError;

#[async_trait]
pub trait InferenceDelegate: Send + Sync {
    /// A human-readable name for this delegate (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Classify `text` through the external provider.
    ///
    /// Must not panic on bad replies; every failure is reported as an
    /// [`InferenceError`].
    async fn infer(&self, text: &str) -> std::result::Result<Action, InferenceError>;
}
