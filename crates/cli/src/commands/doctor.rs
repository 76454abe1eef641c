//! `intentgate doctor`: diagnose configuration.

use intentgate_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 IntentGate Doctor — Configuration Diagnostics");
    println!("================================================\n");

    let mut issues = 0;

    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `intentgate onboard`)");
        issues += 1;
    }

    match AppConfig::load_with_env(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            println!("  ✅ Daily limit: {} commands per client", config.daily_limit);

            if config.has_api_key() {
                println!(
                    "  ✅ Inference mode: {} via {}",
                    config.inference.model, config.inference.base_url
                );
            } else {
                println!("  ⚠️  No API key — classifying with the rule table only");
                issues += 1;
            }

            if config.gateway.allowed_origins.is_empty() {
                println!("  ⚠️  No allowed origins — browsers will be refused by CORS");
                issues += 1;
            } else {
                println!(
                    "  ✅ Allowed origins: {}",
                    config.gateway.allowed_origins.join(", ")
                );
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
