//! `skyline onboard` — First-time setup.

use std::path::Path;

use skyline_config::AppConfig;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🏠 Skyline — First-Time Setup");
    println!("=============================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("  Config file exists: {}", config_path.display());
    } else {
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("✅ Created {}", config_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Set SKYLINE_API_KEY (or GEMINI_API_KEY), or add api_key to the config");
    println!("  2. Point knowledge.path at your knowledge_base.json");
    println!("  3. Run `skyline doctor`, then `skyline chat`");

    Ok(())
}
