//! `skyline doctor` — Diagnose configuration and knowledge base.

use std::path::Path;

use skyline_config::{AppConfig, ConfigError};
use skyline_providers::{build_from_config, requires_api_key};

pub async fn run(
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Skyline Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `skyline onboard`)");
    }

    let config = match loaded {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Fix the configuration before running other checks.");
            return Ok(());
        }
    };

    println!(
        "  ✅ Provider: {} (model {})",
        config.provider.name, config.provider.model
    );

    let key_needed = requires_api_key(&config.provider.name);
    if config.has_api_key() || !key_needed {
        println!("  ✅ API key configured");
    } else {
        println!("  ❌ No API key — set SKYLINE_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    match skyline_knowledge::load(&config.knowledge.path) {
        Ok(document) => println!(
            "  ✅ Knowledge base: {} ({} sections, {} projects, {} FAQs)",
            config.knowledge.path.display(),
            document.section_count(),
            document.project_count(),
            document.faq_count()
        ),
        Err(e) => {
            println!("  ❌ Knowledge base: {e}");
            issues += 1;
        }
    }

    if config.has_api_key() || !key_needed {
        let provider = build_from_config(&config)?;
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider reachable"),
            Ok(false) => {
                println!("  ⚠️  Provider answered but rejected the health check");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider unreachable: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
