//! `skyline chat` — Interactive support session or single question.

use skyline_agent::{SessionLoop, TurnOutcome};
use skyline_channels::CliChannel;
use skyline_config::AppConfig;
use skyline_core::Channel;
use skyline_knowledge::ContextFormatter;
use skyline_providers::{build_from_config, requires_api_key};

use super::{fatal, load_knowledge};

pub async fn run(config: AppConfig, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let interactive = message.is_none();
    let rule = "=".repeat(60);

    if interactive {
        println!("\n{rule}");
        println!("  SKYLINE RESIDENCES - AI CUSTOMER SUPPORT");
        println!("{rule}");
        println!("\n📂 Loading knowledge base...");
    }
    let document = load_knowledge(&config);
    let context = ContextFormatter::new(&config.knowledge.title).format(&document);
    if interactive {
        println!("✅ Knowledge base loaded successfully!");
        println!("📝 Formatting knowledge base for AI...");
    }

    if requires_api_key(&config.provider.name) && !config.has_api_key() {
        fatal(&format!(
            "No API key configured. Set SKYLINE_API_KEY (or GEMINI_API_KEY), or add api_key to {}",
            AppConfig::config_path().display()
        ));
    }

    if interactive {
        println!("\n🔧 Initializing chatbot components...");
        println!("  ↳ Setting up {} ({})...", config.provider.name, config.provider.model);
    }
    let provider = build_from_config(&config)?;

    let mut session = SessionLoop::new(&config, provider, &context);

    let Some(message) = message else {
        println!("  ↳ Conversation memory: last {} messages", config.memory.max_messages);
        println!("✅ Chatbot initialized successfully!\n");

        let mut input = CliChannel::new().start().await?;
        let mut stdout = std::io::stdout();
        let end = session.run(&mut input, &mut stdout, ctrl_c()).await?;
        tracing::debug!(?end, session = %session.session_id(), "Chat finished");

        println!("\n{rule}");
        println!("  Session ended. Thank you!");
        println!("{rule}");
        return Ok(());
    };

    let mut stdout = std::io::stdout();
    match session.answer(&message, &mut stdout).await? {
        TurnOutcome::Exit | TurnOutcome::Reply(_) => Ok(()),
        TurnOutcome::EmptyInput | TurnOutcome::Failed(_) => std::process::exit(1),
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
