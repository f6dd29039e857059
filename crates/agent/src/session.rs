//! The session loop — one customer conversation from greeting to farewell.
//!
//! ```text
//! AwaitingInput ──line──▶ Processing ──reply / failure──▶ AwaitingInput
//!       │                     │
//!       └── exit keyword, EOF, interrupt ──▶ Terminated
//! ```
//!
//! Turns are handled strictly one at a time: the next line is not read until
//! the provider call for the current one has finished. Memory only changes
//! after a successful call, and then always by a user/assistant pair.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use skyline_config::{AppConfig, SessionConfig};
use skyline_core::channel::ChannelMessage;
use skyline_core::error::{ChannelError, ProviderError};
use skyline_core::message::{SessionId, Turn};
use skyline_core::provider::{Provider, ProviderRequest, SamplingParams};
use skyline_memory::SessionMemory;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::policy::ResponsePolicy;
use crate::prompt::PromptAssembler;

/// Target for the conversation transcript log.
pub const TRANSCRIPT_TARGET: &str = "skyline::transcript";

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitKeyword,
    Interrupted,
    EndOfInput,
}

/// Result of feeding one line to the session.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The line was an exit keyword
    Exit,
    /// The line was blank; nothing happened
    EmptyInput,
    /// The provider answered; both turns are in memory
    Reply(String),
    /// The provider failed; memory is untouched
    Failed(ProviderError),
}

enum Triage<'a> {
    Exit,
    Empty,
    Question(&'a str),
}

pub struct SessionLoop {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingParams,
    system_instruction: Option<String>,
    assembler: PromptAssembler,
    policy: ResponsePolicy,
    memory: SessionMemory,
    session: SessionConfig,
    exit_keywords: Vec<String>,
    ai_prefix: String,
    log_queries: bool,
    log_responses: bool,
    session_id: SessionId,
}

impl SessionLoop {
    /// Set up a session over an already formatted knowledge base.
    pub fn new(config: &AppConfig, provider: Arc<dyn Provider>, context: &str) -> Self {
        let assembler = PromptAssembler::new(&config.prompt.template, context)
            .with_prefixes(&config.prompt.human_prefix, &config.prompt.ai_prefix);

        Self {
            provider,
            model: config.provider.model.clone(),
            sampling: config.provider.sampling(),
            system_instruction: config.prompt.system_instruction.clone(),
            assembler,
            policy: ResponsePolicy::new(&config.policy),
            memory: SessionMemory::new(config.memory.max_messages),
            session: config.session.clone(),
            exit_keywords: config
                .session
                .exit_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            ai_prefix: config.prompt.ai_prefix.clone(),
            log_queries: config.logging.log_user_queries,
            log_responses: config.logging.log_bot_responses,
            session_id: SessionId::new(),
        }
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether `input` ends the session (trimmed, case-insensitive).
    pub fn is_exit(&self, input: &str) -> bool {
        let normalized = input.trim().to_lowercase();
        self.exit_keywords.iter().any(|k| *k == normalized)
    }

    fn triage<'a>(&self, line: &'a str) -> Triage<'a> {
        let input = line.trim();
        if self.is_exit(input) {
            Triage::Exit
        } else if input.is_empty() {
            Triage::Empty
        } else {
            Triage::Question(input)
        }
    }

    /// Feed one raw line through the state machine, without any terminal I/O.
    pub async fn handle_line(&mut self, line: &str) -> TurnOutcome {
        match self.triage(line) {
            Triage::Exit => TurnOutcome::Exit,
            Triage::Empty => TurnOutcome::EmptyInput,
            Triage::Question(input) => match self.ask(input).await {
                Ok(reply) => TurnOutcome::Reply(reply),
                Err(e) => TurnOutcome::Failed(e),
            },
        }
    }

    /// Answer one question: assemble the prompt from the current memory,
    /// call the provider, and record the exchange on success.
    pub async fn ask(&mut self, input: &str) -> Result<String, ProviderError> {
        let prompt = self.assembler.prompt_for(self.memory.iter(), input);
        let request = ProviderRequest::from_prompt(
            self.model.clone(),
            self.system_instruction.as_deref(),
            prompt,
            self.sampling,
        );

        let question = Turn::user(input);
        if self.log_queries {
            info!(
                target: TRANSCRIPT_TARGET,
                session = %self.session_id,
                at = %question.timestamp().to_rfc3339(),
                "User: {input}"
            );
        }
        debug!(
            session = %self.session_id,
            provider = self.provider.name(),
            history_turns = self.memory.len(),
            "Sending turn to provider"
        );

        let response = self.provider.complete(request).await.inspect_err(|e| {
            warn!(session = %self.session_id, error = %e, "Provider call failed");
        })?;

        let reply = self.policy.apply(input, response.message.content);

        let answer = Turn::assistant(reply.clone());
        if self.log_responses {
            info!(
                target: TRANSCRIPT_TARGET,
                session = %self.session_id,
                at = %answer.timestamp().to_rfc3339(),
                "Bot: {reply}"
            );
        }

        self.memory.append(question);
        self.memory.append(answer);
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                model = %response.model,
                "Turn complete"
            );
        }

        Ok(reply)
    }

    /// Drive the interactive loop until an exit keyword, end of input, or
    /// `interrupt` resolves.
    ///
    /// `interrupt` is raced against both waiting for input and the provider
    /// call. An interrupted call leaves memory untouched.
    pub async fn run<W, F>(
        &mut self,
        input: &mut mpsc::Receiver<Result<ChannelMessage, ChannelError>>,
        out: &mut W,
        interrupt: F,
    ) -> io::Result<SessionEnd>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        writeln!(out, "{}", self.session.greeting)?;
        writeln!(out, "{}", "=".repeat(60))?;

        let end = loop {
            write!(out, "\n👤 You: ")?;
            out.flush()?;

            let line = tokio::select! {
                biased;
                _ = &mut interrupt => break SessionEnd::Interrupted,
                next = input.recv() => match next {
                    Some(Ok(msg)) => msg.content,
                    Some(Err(e)) => {
                        warn!(error = %e, "Input channel failed");
                        break SessionEnd::EndOfInput;
                    }
                    None => break SessionEnd::EndOfInput,
                },
            };

            let question = match self.triage(&line) {
                Triage::Exit => break SessionEnd::ExitKeyword,
                Triage::Empty => {
                    writeln!(out, "{}", self.session.empty_input)?;
                    continue;
                }
                Triage::Question(q) => q,
            };

            if self.session.show_typing_indicator {
                writeln!(out, "\n🤖 {} is typing...", self.ai_prefix)?;
                out.flush()?;
            }

            let result = tokio::select! {
                biased;
                _ = &mut interrupt => break SessionEnd::Interrupted,
                result = self.ask(question) => result,
            };

            match result {
                Ok(reply) => writeln!(out, "\n🤖 {}: {reply}", self.ai_prefix)?,
                Err(e) => self.write_failure(out, &e)?,
            }
        };

        match end {
            SessionEnd::ExitKeyword => writeln!(out, "\n{}", self.session.farewell)?,
            SessionEnd::Interrupted => writeln!(out, "\n\n{}", self.session.interrupt_farewell)?,
            SessionEnd::EndOfInput => writeln!(out)?,
        }
        out.flush()?;

        info!(session = %self.session_id, turns = self.memory.len(), end = ?end, "Session ended");
        Ok(end)
    }

    /// Handle a single line outside the interactive loop and print the
    /// bare result: nothing for an exit keyword, the empty-input notice,
    /// the reply, or the error with the fallback message.
    pub async fn answer<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<TurnOutcome> {
        let outcome = self.handle_line(line).await;
        match &outcome {
            TurnOutcome::Exit => {}
            TurnOutcome::EmptyInput => writeln!(out, "{}", self.session.empty_input)?,
            TurnOutcome::Reply(reply) => writeln!(out, "{reply}")?,
            TurnOutcome::Failed(e) => self.write_failure(out, e)?,
        }
        out.flush()?;
        Ok(outcome)
    }

    fn write_failure<W: Write>(&self, out: &mut W, e: &ProviderError) -> io::Result<()> {
        writeln!(out, "\n❌ Error: {e}")?;
        writeln!(out, "{}", self.session.fallback_response)?;
        if self.session.verbose {
            writeln!(out, "{e:?}")?;
        }
        Ok(())
    }
}
