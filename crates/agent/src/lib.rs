//! The conversation side of Skyline.
//!
//! Each customer turn goes through the same steps:
//!
//! 1. **Receive** a line from the channel
//! 2. **Screen** it: exit keywords end the session, blank lines are ignored
//! 3. **Assemble** the prompt (knowledge base context + history + question)
//! 4. **Send** it to the configured provider
//! 5. **Record** the exchange in session memory and print the reply
//!
//! A provider failure is reported and the session carries on with memory
//! unchanged.

pub mod policy;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use policy::{QuestionKind, ResponsePolicy};
pub use prompt::PromptAssembler;
pub use session::{SessionEnd, SessionLoop, TRANSCRIPT_TARGET, TurnOutcome};
