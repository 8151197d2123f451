//! `devduo models` — List chat models available to your API key.

use devduo_config::AppConfig;
use devduo_providers::{FALLBACK_MODEL, available_chat_models, recommend};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        println!("❌ Error: no API key found (set OPENAI_API_KEY or add api_key to config.toml)");
        return Ok(());
    }

    let router = devduo_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    println!("🔍 Checking available models...");
    let models = match available_chat_models(&provider).await {
        Ok(models) => models,
        Err(e) => {
            println!("❌ Error checking models: {e}");
            println!("\nThis might indicate:");
            println!("  - Invalid API key");
            println!("  - No internet connection");
            println!("  - API key doesn't have proper permissions");
            return Ok(());
        }
    };

    println!("\n✅ Found {} chat models available:", models.len());
    println!("{}", "-".repeat(50));
    for model in &models {
        println!("  📝 {model}");
    }

    let recs = recommend(&models);
    println!("\n💡 Recommendations:");
    if let Some(model) = &recs.most_capable {
        println!("  🌟 Use GPT-4: {model} (most capable)");
    }
    if let Some(model) = &recs.cost_effective {
        println!("  💰 Use {model} (cost-effective)");
    }

    println!("\n🔧 Update {} with:", AppConfig::config_dir().join("config.toml").display());
    println!("default_model = \"{FALLBACK_MODEL}\"");

    Ok(())
}
