//! `skyline context` — Print the formatted knowledge base.

use skyline_config::AppConfig;
use skyline_knowledge::ContextFormatter;

use super::load_knowledge;

pub fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_knowledge(config);
    print!("{}", ContextFormatter::new(&config.knowledge.title).format(&document));
    Ok(())
}
