//! `devduo doctor` — Diagnose configuration.

use devduo_config::AppConfig;
use devduo_providers::available_chat_models;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 DevDuo Doctor — Configuration Diagnostics");
    println!("===========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `devduo onboard` to create one)");
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            println!("     provider: {}", config.default_provider);
            println!("     model:    {}", config.default_model);
            println!("     iterations: {}", config.collaboration.max_iterations);

            if config.has_api_key() {
                println!("  ✅ API key configured");

                let router = devduo_providers::router::build_from_config(&config);
                match router.default() {
                    Some(provider) => match available_chat_models(&provider).await {
                        Ok(models) => {
                            println!("  ✅ Provider reachable ({} chat models)", models.len());
                            if !models.iter().any(|m| m == &config.default_model) {
                                println!(
                                    "  ⚠️  Configured model '{}' not in the model list",
                                    config.default_model
                                );
                                issues += 1;
                            }
                        }
                        Err(e) => {
                            println!("  ❌ Provider check failed: {e}");
                            issues += 1;
                        }
                    },
                    None => {
                        println!("  ❌ No default provider configured");
                        issues += 1;
                    }
                }
            } else {
                println!("  ⚠️  No API key configured (set OPENAI_API_KEY or add api_key to config.toml)");
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
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
