//! Response policy — decides whether a reply needs the general-knowledge
//! disclaimer.

use skyline_config::{PolicyConfig, ResponseMode};

/// What a customer question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Mentions something the knowledge base answers (price, RERA, contact...)
    Property,
    /// Anything else
    General,
}

#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    mode: ResponseMode,
    allow_general: bool,
    keywords: Vec<String>,
    disclaimer: String,
}

impl ResponsePolicy {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            mode: config.mode,
            allow_general: config.allow_general_knowledge,
            keywords: config
                .strict_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            disclaimer: config.disclaimer.clone(),
        }
    }

    /// Substring match against the lowercased input.
    pub fn classify(&self, input: &str) -> QuestionKind {
        let lowered = input.to_lowercase();
        if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            QuestionKind::Property
        } else {
            QuestionKind::General
        }
    }

    /// Final reply text for `input`.
    pub fn apply(&self, input: &str, reply: String) -> String {
        let flag = self.mode == ResponseMode::Hybrid
            && self.allow_general
            && self.classify(input) == QuestionKind::General;
        if flag {
            reply + &self.disclaimer
        } else {
            reply
        }
    }
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_keywords_are_case_insensitive() {
        let policy = ResponsePolicy::default();
        assert_eq!(policy.classify("What is the PRICE of a 3BHK?"), QuestionKind::Property);
        assert_eq!(policy.classify("Tell me about Skyline Villas"), QuestionKind::Property);
        assert_eq!(policy.classify("Is Pune a good city to live in?"), QuestionKind::General);
    }

    #[test]
    fn hybrid_appends_disclaimer_to_general_answers() {
        let policy = ResponsePolicy::default();
        let reply = policy.apply("What is a good school nearby?", "Several options.".into());
        assert!(reply.starts_with("Several options."));
        assert!(reply.ends_with("contact our team."));

        let reply = policy.apply("booking amount?", "Rs 2 lakhs.".into());
        assert_eq!(reply, "Rs 2 lakhs.");
    }

    #[test]
    fn strict_and_general_modes_never_append() {
        for mode in [ResponseMode::Strict, ResponseMode::General] {
            let config = PolicyConfig {
                mode,
                ..PolicyConfig::default()
            };
            let policy = ResponsePolicy::new(&config);
            assert_eq!(policy.apply("weather today?", "Sunny.".into()), "Sunny.");
        }
    }

    #[test]
    fn disallowed_general_knowledge_skips_disclaimer() {
        let config = PolicyConfig {
            allow_general_knowledge: false,
            ..PolicyConfig::default()
        };
        let policy = ResponsePolicy::new(&config);
        assert_eq!(policy.apply("weather today?", "Sunny.".into()), "Sunny.");
    }

    #[test]
    fn blank_keywords_are_ignored() {
        let config = PolicyConfig {
            strict_keywords: vec!["  ".into(), "Villa".into()],
            ..PolicyConfig::default()
        };
        let policy = ResponsePolicy::new(&config);
        assert_eq!(policy.classify("any villas left?"), QuestionKind::Property);
        assert_eq!(policy.classify("hello"), QuestionKind::General);
    }
}
