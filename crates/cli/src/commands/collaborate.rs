//! `devduo collaborate` — Run a writer/reviewer session on a coding task.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use devduo_agent::{CollaborationEngine, CollaborationError, CollaborationResult, save_result};
use devduo_config::AppConfig;
use devduo_core::error::ProviderError;
use devduo_core::event::{DomainEvent, EventBus};
use devduo_providers::FALLBACK_MODEL;
use devduo_providers::models::available_chat_models_or_empty;
use tokio::sync::broadcast::error::RecvError;

pub const EXAMPLE_TASKS: [&str; 5] = [
    "Write a function to calculate fibonacci numbers efficiently",
    "Write a function to reverse a string with proper error handling",
    "Write a function to check if a number is prime",
    "Write a function to find the longest palindrome in a string",
    "Write a function to implement binary search",
];

pub struct CollaborateArgs {
    pub task: Option<String>,
    pub iterations: Option<u32>,
    pub model: Option<String>,
    pub output: Option<PathBuf>,
    /// `None` asks interactively
    pub save: Option<bool>,
    pub quiet: bool,
}

pub async fn run(args: CollaborateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🤖 Welcome to DevDuo - AI Pair Programming System");
    println!("{}", "=".repeat(50));

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!("    export DEVDUO_API_KEY='sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Ok(());
    }

    let router = devduo_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    let model = match args.model {
        Some(model) => model,
        None => {
            println!("\n🔍 Checking available models...");
            let models = available_chat_models_or_empty(&provider).await;
            select_model(&models, &config.default_model)?
        }
    };

    let task = match args.task {
        Some(task) => task,
        None => select_task()?,
    };

    let max_iterations = args.iterations.unwrap_or(config.collaboration.max_iterations);
    let verbose = config.collaboration.verbose && !args.quiet;

    let event_bus = Arc::new(EventBus::default());
    let printer = tokio::spawn(print_turns(event_bus.subscribe()));
    let engine = CollaborationEngine::from_config(provider, &model, &config, event_bus);

    println!("\n🔄 Starting collaboration with {model}");
    println!("📝 Task: {task}");

    let outcome = engine.collaborate(&task, max_iterations, verbose).await;

    // Dropping the last bus handle closes the channel so the printer drains and exits.
    drop(engine);
    let _ = printer.await;

    let result = match outcome {
        Ok(result) => result,
        Err(CollaborationError::Critical { model, source, .. }) => {
            print_critical_banner(&model, &source);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    print_final_results(&result);

    let should_save = match args.save {
        Some(save) => save,
        None => {
            let answer = prompt_line("\nWould you like to save the results to a file? (y/n): ")?;
            answer.eq_ignore_ascii_case("y")
        }
    };

    if should_save {
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(&config.output.result_file));
        match save_result(&result, &path) {
            Ok(path) => println!("\n💾 Results saved to {}", path.display()),
            Err(e) => eprintln!("❌ Error saving results: {e}"),
        }
    }

    Ok(())
}

/// Print collaboration progress as the engine publishes it.
async fn print_turns(mut rx: tokio::sync::broadcast::Receiver<Arc<DomainEvent>>) {
    let mut max_iterations = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(text) = render_event(&event, &mut max_iterations) {
                    println!("{text}");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Turn printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Text shown for one event. `max_iterations` is remembered from the start
/// event so writer turns can carry an `Iteration i/N` header.
pub fn render_event(event: &DomainEvent, max_iterations: &mut u32) -> Option<String> {
    match event {
        DomainEvent::CollaborationStarted { max_iterations: max, .. } => {
            *max_iterations = *max;
            None
        }
        DomainEvent::TurnCompleted { role, iteration, content, .. } => {
            let mut out = String::new();
            let icon = if role.starts_with("Writer") {
                out.push_str(&format!("\n--- Iteration {iteration}/{max_iterations} ---\n"));
                "✍️ "
            } else {
                "🔍"
            };
            out.push_str(&format!("\n{icon} {role}:\n{}\n{content}", "-".repeat(40)));
            Some(out)
        }
        DomainEvent::ReviewerSatisfied { iteration, .. } => Some(format!(
            "\n✅ Collaboration complete! Reviewer is satisfied (iteration {iteration})."
        )),
        DomainEvent::CollaborationFinished { iterations, code_found, .. } => {
            let code = if *code_found { "code found" } else { "no code found" };
            Some(format!("\n🏁 Finished after {iterations} iteration(s), {code}."))
        }
        DomainEvent::ErrorOccurred { .. } => None,
    }
}

fn prompt_line(prompt: &str) -> std::io::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn select_model(models: &[String], configured: &str) -> std::io::Result<String> {
    if models.is_empty() {
        println!("⚠️  No models detected. Using default: {configured}");
        return Ok(configured.to_string());
    }

    println!("\n🔍 Found {} available models:", models.len());
    println!("{}", "-".repeat(40));
    for (i, model) in models.iter().enumerate() {
        println!("{}. {model}", i + 1);
    }

    println!("\nChoose a model number or press Enter for default:");
    let input = prompt_line("> ")?;
    let (model, picked) = choose_model(&input, models);
    if picked {
        println!("✅ Selected: {model}");
    } else {
        println!("✅ Using default: {model}");
    }
    Ok(model)
}

/// Resolve a model menu answer. The bool is false when the default was used.
pub fn choose_model(input: &str, models: &[String]) -> (String, bool) {
    match menu_index(input, models.len()) {
        Some(i) => (models[i].clone(), true),
        None => (
            models.first().cloned().unwrap_or_else(|| FALLBACK_MODEL.to_string()),
            false,
        ),
    }
}

fn select_task() -> std::io::Result<String> {
    println!("\nExample tasks:");
    for (i, task) in EXAMPLE_TASKS.iter().enumerate() {
        println!("{}. {task}", i + 1);
    }

    println!("\nChoose an example task (1-{}) or enter your own:", EXAMPLE_TASKS.len());
    let input = prompt_line("> ")?;
    Ok(choose_task(&input))
}

/// Resolve a task menu answer: a menu number, free text, or empty for the first example.
pub fn choose_task(input: &str) -> String {
    let input = input.trim();
    if let Some(i) = menu_index(input, EXAMPLE_TASKS.len()) {
        EXAMPLE_TASKS[i].to_string()
    } else if input.is_empty() {
        EXAMPLE_TASKS[0].to_string()
    } else {
        input.to_string()
    }
}

/// 1-based menu answer to a 0-based index.
fn menu_index(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

/// Cause-specific advice printed under the critical error banner.
pub fn critical_hint(model: &str, error: &ProviderError) -> Vec<String> {
    match error {
        ProviderError::ModelUnavailable(_) => vec![
            format!("❌ Model '{model}' is not available with your API key."),
            "This usually means:".into(),
            "  • You selected a model your account can't access".into(),
            "  • Free accounts typically only have access to gpt-3.5-turbo".into(),
            "  • GPT-4 models require a paid account with usage history".into(),
            format!("\n💡 Try running again with --model {FALLBACK_MODEL}"),
        ],
        ProviderError::QuotaExceeded(_) => vec![
            "❌ You've exceeded your API quota (out of credits).".into(),
            "💳 Please add credits to your account and try again.".into(),
        ],
        ProviderError::RateLimited { .. } => vec![
            "❌ Rate limit exceeded.".into(),
            "⏰ Please wait a moment and try again.".into(),
        ],
        other => vec![
            format!("❌ API Error: {other}"),
            "🔧 Please check your API key and account status.".into(),
        ],
    }
}

fn print_critical_banner(model: &str, error: &ProviderError) {
    println!("\n{}", "=".repeat(50));
    println!("💥 CRITICAL ERROR");
    println!("{}", "=".repeat(50));
    for line in critical_hint(model, error) {
        println!("{line}");
    }
    println!("\n👋 Exiting DevDuo...");
}

fn print_final_results(result: &CollaborationResult) {
    println!("\n{}", "=".repeat(50));
    println!("🎯 FINAL RESULTS");
    println!("{}", "=".repeat(50));
    println!("Task: {}", result.task);
    println!("Iterations: {}", result.iterations);
    println!("\nFinal Code:");
    println!("{}", result.final_code);
}
