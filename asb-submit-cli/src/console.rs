//! [`Transport`] for a terminal session: status lines go to the log,
//! prompts are answered on stdin.

use std::path::Path;

use async_trait::async_trait;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use asb_submit_lib::transport::{FILE_KEYWORD, TOKEN_NO, TOKEN_OFFICIAL, TOKEN_YES};
use asb_submit_lib::{Attachment, IncomingMessage, Prompt, SubmitError, Submitter, Transport};

/// Keyboard shortcut for each reply token.
const KEYS: [(&str, &str); 3] = [("o", TOKEN_OFFICIAL), ("y", TOKEN_YES), ("n", TOKEN_NO)];

fn token_for_key(input: &str) -> Option<&'static str> {
    let input = input.trim();
    KEYS.iter()
        .find(|(key, token)| input.eq_ignore_ascii_case(key) || input == *token)
        .map(|(_, token)| *token)
}

fn key_for_token(token: &str) -> &'static str {
    KEYS.iter()
        .find(|(_, t)| *t == token)
        .map(|(key, _)| *key)
        .unwrap_or("?")
}

pub(crate) struct ConsoleTransport {
    user: String,
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleTransport {
    pub(crate) fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    async fn read_line(&self) -> Result<String, SubmitError> {
        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(SubmitError::transport("stdin closed")),
            Err(e) => Err(SubmitError::transport(e.to_string())),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn notify(&self, _to: &Submitter, message: &str) -> Result<(), SubmitError> {
        log::info!("{message}");
        Ok(())
    }

    async fn ask(&self, _to: &Submitter, prompt: Prompt) -> Result<String, SubmitError> {
        log::info!("{}", prompt.text());
        let keys: Vec<&str> = prompt
            .options()
            .iter()
            .map(|(token, _)| key_for_token(token))
            .collect();
        log::info!(
            "{}",
            format!("[{}]", keys.join("/")).if_supports_color(Stdout, |t| t.bold())
        );
        let line = self.read_line().await?;
        Ok(token_for_key(&line)
            .map(str::to_string)
            .unwrap_or(line))
    }

    async fn next_message(&self, channel: &str) -> Result<IncomingMessage, SubmitError> {
        log::info!("Path to the Game.ini file:");
        let line = self.read_line().await?;
        let path = Path::new(line.trim());
        let attachments = match std::fs::read(path) {
            Ok(bytes) => vec![Attachment {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                bytes,
            }],
            Err(e) => {
                log::warn!("Could not read {}: {e}", path.display());
                Vec::new()
            }
        };
        Ok(IncomingMessage {
            author: self.user.clone(),
            channel: channel.to_string(),
            content: FILE_KEYWORD.to_string(),
            attachments,
        })
    }

    async fn notify_operator(&self, message: &str) -> Result<(), SubmitError> {
        log::error!(
            "{} {message}",
            "operator:".if_supports_color(Stdout, |t| t.red())
        );
        Ok(())
    }
}
