//! `intentgate classify`: resolve one prompt without starting a server.
//!
//! The action is printed to stdout as JSON in the same shape `POST /command`
//! uses for `action`/`params`/`error`; `--explain` notes go to stderr.

use intentgate_classifier::{Classifier, RuleClassifier};
use intentgate_config::AppConfig;
use intentgate_core::RawAction;
use std::path::Path;
use std::time::Duration;

pub async fn run(
    config_path: &Path,
    prompt: &str,
    explain: bool,
    rules_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with_env(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let delegate = if rules_only {
        None
    } else {
        intentgate_providers::build_from_config(&config)
    };
    let classifier = Classifier::from_delegate(
        delegate,
        Duration::from_secs(config.inference.timeout_secs),
    );
    tracing::debug!(mode = classifier.mode_name(), "Classifying prompt");

    if explain {
        eprintln!("{}", explanation(&classifier, prompt));
    }

    let action = classifier.resolve(prompt).await;
    println!("{}", serde_json::to_string_pretty(&RawAction::from(action))?);

    Ok(())
}

fn explanation(classifier: &Classifier, prompt: &str) -> String {
    if classifier.uses_inference() {
        return format!(
            "🔎 Classified by delegate '{}'; no rule trace available",
            classifier.mode_name()
        );
    }
    match RuleClassifier::new().explain(prompt) {
        Some(hit) => format!("🔎 Matched {hit}"),
        None => "🔎 No rule matched; answering UNKNOWN".to_string(),
    }
}
