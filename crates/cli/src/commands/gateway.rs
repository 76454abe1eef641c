//! `intentgate gateway`: start the HTTP command gateway.

use intentgate_config::AppConfig;
use std::path::Path;

pub async fn run(
    config_path: &Path,
    port_override: Option<u16>,
    rules_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        AppConfig::load_with_env(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let mode = if rules_only || !config.has_api_key() {
        "rules"
    } else {
        config.inference.model.as_str()
    };

    println!("🚦 IntentGate Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Classifier: {mode}");
    println!("   Daily limit: {} commands per client", config.daily_limit);

    intentgate_gateway::start(config, rules_only).await?;

    Ok(())
}
