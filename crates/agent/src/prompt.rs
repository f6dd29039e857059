//! Prompt assembly — template + context + history + input.
//!
//! The template is tokenized once. `{context}` is resolved when the
//! assembler is built (once per session); `{history}` and `{input}` are
//! resolved on every turn. Substitution is single-pass over the template, so
//! braces that appear inside the context, history, or user input are never
//! expanded. Any other `{...}` text stays literal, and a template that lacks
//! a slot simply never receives that value.

use skyline_core::message::{Speaker, Turn};

pub const CONTEXT_SLOT: &str = "{context}";
pub const HISTORY_SLOT: &str = "{history}";
pub const INPUT_SLOT: &str = "{input}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Context,
    History,
    Input,
}

const SLOTS: [(&str, Slot); 3] = [
    (CONTEXT_SLOT, Slot::Context),
    (HISTORY_SLOT, Slot::History),
    (INPUT_SLOT, Slot::Input),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Slot(Slot),
}

fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match SLOTS.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, slot)) => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Slot(*slot));
                rest = &tail[name.len()..];
            }
            None => {
                literal.push('{');
                rest = &tail[1..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    History,
    Input,
}

/// A template with the session's context already filled in.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    pieces: Vec<Piece>,
    human_prefix: String,
    ai_prefix: String,
}

impl PromptAssembler {
    /// Fix `context` into `template` for the rest of the session.
    pub fn new(template: &str, context: &str) -> Self {
        let mut pieces: Vec<Piece> = Vec::new();

        for token in tokenize(template) {
            let text = match token {
                Token::Literal(text) => text,
                Token::Slot(Slot::Context) => context.to_string(),
                Token::Slot(Slot::History) => {
                    pieces.push(Piece::History);
                    continue;
                }
                Token::Slot(Slot::Input) => {
                    pieces.push(Piece::Input);
                    continue;
                }
            };
            match pieces.last_mut() {
                Some(Piece::Text(prev)) => prev.push_str(&text),
                _ => pieces.push(Piece::Text(text)),
            }
        }

        Self {
            pieces,
            human_prefix: "Customer".into(),
            ai_prefix: "AI Assistant".into(),
        }
    }

    /// Labels used when rendering history lines.
    pub fn with_prefixes(mut self, human: impl Into<String>, ai: impl Into<String>) -> Self {
        self.human_prefix = human.into();
        self.ai_prefix = ai.into();
        self
    }

    /// Fill the per-turn slots.
    pub fn build(&self, history: &str, input: &str) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::History => out.push_str(history),
                Piece::Input => out.push_str(input),
            }
        }
        out
    }

    /// Render turns as `<prefix>: <text>` lines, oldest first.
    pub fn render_history<'t>(&self, turns: impl IntoIterator<Item = &'t Turn>) -> String {
        turns
            .into_iter()
            .map(|turn| {
                let prefix = match turn.speaker() {
                    Speaker::User => &self.human_prefix,
                    Speaker::Assistant => &self.ai_prefix,
                };
                format!("{prefix}: {}", turn.text())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render history from `turns`, then fill both per-turn slots.
    pub fn prompt_for<'t>(&self, turns: impl IntoIterator<Item = &'t Turn>, input: &str) -> String {
        self.build(&self.render_history(turns), input)
    }
}

/// One-shot assembly of a complete prompt.
pub fn build(template: &str, context: &str, history: &str, input: &str) -> String {
    PromptAssembler::new(template, context).build(history, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "KB:\n{context}\n\nHISTORY:\n{history}\n\nQ: {input}\nA:";

    #[test]
    fn fills_all_slots() {
        let prompt = build(TEMPLATE, "Phone: 123", "Customer: hi", "price?");
        assert_eq!(prompt, "KB:\nPhone: 123\n\nHISTORY:\nCustomer: hi\n\nQ: price?\nA:");
    }

    #[test]
    fn context_is_fixed_once() {
        let assembler = PromptAssembler::new(TEMPLATE, "CTX");
        let first = assembler.build("", "one");
        let second = assembler.build("Customer: one", "two");
        assert!(first.contains("CTX") && second.contains("CTX"));
        assert!(second.ends_with("Q: two\nA:"));
    }

    #[test]
    fn placeholders_inside_values_are_not_expanded() {
        let prompt = build(TEMPLATE, "braces {input} in KB", "{context}", "what is {history}?");
        assert!(prompt.contains("braces {input} in KB"));
        assert!(prompt.contains("HISTORY:\n{context}\n"));
        assert!(prompt.contains("Q: what is {history}?"));
    }

    #[test]
    fn unknown_placeholders_stay_literal() {
        let prompt = build("{greeting} {context} {", "X", "", "");
        assert_eq!(prompt, "{greeting} X {");
    }

    #[test]
    fn missing_context_slot_is_tolerated() {
        let prompt = build("Q: {input}", "ignored", "", "hello");
        assert_eq!(prompt, "Q: hello");
    }

    #[test]
    fn repeated_slots_all_fill() {
        let prompt = build("{input}/{input}", "", "", "x");
        assert_eq!(prompt, "x/x");
    }

    #[test]
    fn renders_history_with_prefixes() {
        let turns = [Turn::user("Do you have villas?"), Turn::assistant("Yes, Skyline Villas.")];
        let assembler = PromptAssembler::new(TEMPLATE, "").with_prefixes("Buyer", "Agent");
        assert_eq!(
            assembler.render_history(&turns),
            "Buyer: Do you have villas?\nAgent: Yes, Skyline Villas."
        );
    }

    #[test]
    fn prompt_for_uses_default_prefixes() {
        let turns = [Turn::user("hi"), Turn::assistant("hello")];
        let prompt = PromptAssembler::new(TEMPLATE, "C").prompt_for(&turns, "next");
        assert!(prompt.contains("HISTORY:\nCustomer: hi\nAI Assistant: hello\n"));
    }

    #[test]
    fn empty_history_renders_empty() {
        let assembler = PromptAssembler::new(TEMPLATE, "C");
        assert_eq!(assembler.render_history(std::iter::empty()), "");
    }
}
