//! `intentgate onboard`: first-time setup.

use intentgate_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🚦 IntentGate — First-Time Setup");
    println!("================================\n");

    if let Some(config_dir) = config_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir)?;
            println!("✅ Created config directory: {}", config_dir.display());
        } else {
            println!("  Config directory exists: {}", config_dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set INTENTGATE_API_KEY (or add api_key under [inference]) for LLM classification");
    println!("      Without a key, commands are classified by the built-in rule table");
    println!("   2. Check your setup:  intentgate doctor");
    println!("   3. Start the gateway: intentgate gateway");

    Ok(())
}
