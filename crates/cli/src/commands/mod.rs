pub mod chat;
pub mod context;
pub mod doctor;
pub mod onboard;

use skyline_config::AppConfig;
use skyline_knowledge::KnowledgeDocument;

/// Print a startup failure and exit with status 1.
pub fn fatal(message: &str) -> ! {
    eprintln!("❌ {message}");
    std::process::exit(1)
}

/// Load the configured knowledge base or exit.
pub fn load_knowledge(config: &AppConfig) -> KnowledgeDocument {
    match skyline_knowledge::load(&config.knowledge.path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("❌ {e}");
            fatal("Cannot start chatbot without knowledge base. Exiting...")
        }
    }
}
