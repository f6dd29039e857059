//! CLI channel — interactive terminal-based chat.
//!
//! Reads input line by line and forwards every line untouched, blank ones
//! included. Exit keywords and empty input are the session loop's business.
//!
//! Readers stop as soon as the session drops its receiver. Stdin is read on
//! a dedicated OS thread: a blocking terminal read cannot be cancelled, and
//! a thread outside the runtime does not hold up process exit once the
//! session is over.

use std::io::BufRead;

use async_trait::async_trait;
use skyline_core::channel::{Channel, ChannelId, ChannelMessage};
use skyline_core::error::ChannelError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

const SENDER_ID: &str = "local_user";

type Inbox = mpsc::Receiver<Result<ChannelMessage, ChannelError>>;

/// Interactive CLI channel for terminal-based chat.
pub struct CliChannel {
    id: ChannelId,
}

impl CliChannel {
    pub fn new() -> Self {
        Self {
            id: ChannelId("cli".into()),
        }
    }

    /// Forward lines from any async reader on a runtime task.
    ///
    /// The task ends on EOF, on a read error, or when the receiver is
    /// dropped, even if the reader itself stays open.
    pub fn spawn_reader<R>(&self, reader: R) -> (Inbox, JoinHandle<()>)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        // One line in flight: the session reads the next line only after
        // the current turn completes.
        let (tx, rx) = mpsc::channel(1);
        let channel_id = self.id.clone();

        let handle = tokio::spawn(async move {
            let mut lines = reader.lines();

            loop {
                let next = tokio::select! {
                    _ = tx.closed() => {
                        debug!("session closed, reader stopping");
                        break;
                    }
                    next = lines.next_line() => next,
                };

                match next {
                    Ok(Some(line)) => {
                        let msg = ChannelMessage::new(channel_id.clone(), SENDER_ID, line);
                        if tx.send(Ok(msg)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("input closed");
                        break; // EOF (Ctrl+D)
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        (rx, handle)
    }

    /// Forward stdin lines from a detached OS thread.
    fn spawn_stdin_reader(&self) -> Result<Inbox, ChannelError> {
        let (tx, rx) = mpsc::channel(1);
        let channel_id = self.id.clone();

        std::thread::Builder::new()
            .name("skyline-stdin".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let item = line
                        .map(|line| ChannelMessage::new(channel_id.clone(), SENDER_ID, line))
                        .map_err(|e| ChannelError::ConnectionLost(e.to_string()));
                    let failed = item.is_err();
                    if tx.blocking_send(item).is_err() || failed {
                        return;
                    }
                }
                debug!("stdin closed");
            })
            .map_err(|e| ChannelError::ConnectionLost(format!("cannot start stdin reader: {e}")))?;

        Ok(rx)
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn start(&self) -> Result<Inbox, ChannelError> {
        self.spawn_stdin_reader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, BufReader};

    #[test]
    fn cli_channel_properties() {
        let ch = CliChannel::new();
        assert_eq!(ch.name(), "cli");
        assert_eq!(ch.id().0, "cli");
    }

    #[tokio::test]
    async fn forwards_lines_including_blank_ones() {
        let ch = CliChannel::new();
        let input: &'static [u8] = b"hello\n\n  quit  \n";
        let (mut rx, reader) = ch.spawn_reader(BufReader::new(input));

        let mut got = Vec::new();
        while let Some(msg) = rx.recv().await {
            got.push(msg.unwrap().content);
        }
        assert_eq!(got, ["hello", "", "  quit  "]);
        reader.await.unwrap();
    }

    #[tokio::test]
    async fn closes_on_eof() {
        let ch = CliChannel::new();
        let input: &'static [u8] = b"";
        let (mut rx, _reader) = ch.spawn_reader(BufReader::new(input));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn reader_stops_when_receiver_dropped_while_input_stays_open() {
        let ch = CliChannel::new();
        let (mut writer, read_half) = tokio::io::duplex(64);
        let (mut rx, reader) = ch.spawn_reader(BufReader::new(read_half));

        writer.write_all(b"bye\n").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().unwrap().content, "bye");

        // The writer stays alive: no EOF will ever arrive.
        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), reader)
            .await
            .expect("reader kept running after the receiver was dropped")
            .unwrap();

        writer.write_all(b"late\n").await.unwrap_err();
    }
}
