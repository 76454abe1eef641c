//! External inference delegates for IntentGate.
//!
//! All delegates implement `intentgate_core::InferenceDelegate`.
//! [`build_from_config`] creates the configured one, if an API key is set.

pub mod openrouter;
pub mod prompt;
pub mod reply;

use std::sync::Arc;

use intentgate_config::AppConfig;
use intentgate_core::InferenceDelegate;

pub use openrouter::OpenRouterDelegate;

/// The delegate selected by `config`, or `None` for rule-based mode.
pub fn build_from_config(config: &AppConfig) -> Option<Arc<dyn InferenceDelegate>> {
    let api_key = config
        .inference
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())?;
    let delegate = OpenRouterDelegate::new(
        "openrouter",
        &config.inference.base_url,
        api_key,
    )
    .with_model(&config.inference.model)
    .with_sampling(config.inference.temperature, config.inference.max_tokens)
    .with_timeout(std::time::Duration::from_secs(config.inference.timeout_secs))
    .with_attribution(&config.inference.referer, &config.inference.title);
    Some(Arc::new(delegate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_delegate() {
        assert!(build_from_config(&AppConfig::default()).is_none());
    }

    #[test]
    fn key_builds_openrouter_delegate() {
        let mut config = AppConfig::default();
        config.inference.api_key = Some("sk-test".into());
        let delegate = build_from_config(&config).unwrap();
        assert_eq!(delegate.name(), "openrouter");
    }

    #[test]
    fn blank_key_means_rules_mode() {
        let mut config = AppConfig::default();
        config.inference.api_key = Some("   ".into());
        assert!(build_from_config(&config).is_none());
    }
}
