//! The messaging side of a submission: prompts, replies and follow-up files.
//!
//! The workflow only talks to a [`Transport`]; a chat bot, a console or a
//! test double can stand behind it.

use std::fmt;

use async_trait::async_trait;

use crate::archive::GAME_INI;
use crate::error::SubmitError;

pub const TOKEN_OFFICIAL: &str = "\u{1F1F4}";
pub const TOKEN_YES: &str = "\u{2705}";
pub const TOKEN_NO: &str = "\u{274C}";

/// Keyword a follow-up message must contain to deliver a `Game.ini`.
pub const FILE_KEYWORD: &str = "game";

/// Who sent a submission and where replies go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Submitter {
    pub id: String,
    pub channel: String,
}

impl Submitter {
    pub fn new(id: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.channel)
    }
}

/// A decision the submitter can make in reply to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    TreatAsOfficial,
    SupplyServerConfig,
    Cancel,
    Singleplayer,
    Server,
}

/// The two interactive questions the workflow can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Unofficial upload without a usable `Game.ini`.
    MissingServerConfig,
    /// Official upload without a `Game.ini`: singleplayer or server?
    Platform,
}

impl Prompt {
    /// Reply tokens paired with the choice each one selects.
    pub fn options(self) -> &'static [(&'static str, Choice)] {
        match self {
            Self::MissingServerConfig => &[
                (TOKEN_OFFICIAL, Choice::TreatAsOfficial),
                (TOKEN_YES, Choice::SupplyServerConfig),
                (TOKEN_NO, Choice::Cancel),
            ],
            Self::Platform => &[
                (TOKEN_YES, Choice::Singleplayer),
                (TOKEN_NO, Choice::Server),
            ],
        }
    }

    /// Map a reply token to a choice; unknown tokens are `None`.
    pub fn resolve(self, token: &str) -> Option<Choice> {
        self.options()
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, choice)| *choice)
    }

    pub fn text(self) -> String {
        match self {
            Self::MissingServerConfig => format!(
                "Game.ini is missing or is not valid.\n\
                 Select {TOKEN_OFFICIAL} to process as Official\n\
                 Select {TOKEN_YES} if you would like to provide Game.ini separately.\n\
                 Select {TOKEN_NO} to cancel your upload"
            ),
            Self::Platform => format!(
                "Is this from SinglePlayer or a server?\n\
                 Select {TOKEN_YES} for SP or {TOKEN_NO} for server."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A message seen on the transport while waiting for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author: String,
    pub channel: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

/// Which follow-up message counts as delivering the server config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub author: String,
    pub channel: String,
    pub keyword: String,
    pub filename: String,
}

impl FileRequest {
    /// Request a `Game.ini` from `submitter`, in their channel.
    pub fn game_ini(submitter: &Submitter) -> Self {
        Self {
            author: submitter.id.clone(),
            channel: submitter.channel.clone(),
            keyword: FILE_KEYWORD.to_string(),
            filename: GAME_INI.to_string(),
        }
    }

    /// Same author and channel, the keyword somewhere in the text (any
    /// case), and exactly one attachment with the exact expected name.
    pub fn matches(&self, message: &IncomingMessage) -> bool {
        message.author == self.author
            && message.channel == self.channel
            && message.content.to_lowercase().contains(&self.keyword.to_lowercase())
            && message.attachments.len() == 1
            && message.attachments[0].filename == self.filename
    }
}

/// Messaging collaborator used by the workflow.
///
/// The waiting calls ([`Transport::ask`], [`Transport::next_message`]) may
/// block for as long as they like; the workflow bounds them with its own
/// timeouts and cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a status line to the submitter.
    async fn notify(&self, to: &Submitter, message: &str) -> Result<(), SubmitError>;

    /// Show `prompt` and return the next reply token from the submitter.
    async fn ask(&self, to: &Submitter, prompt: Prompt) -> Result<String, SubmitError>;

    /// Return the next message posted in `channel`.
    async fn next_message(&self, channel: &str) -> Result<IncomingMessage, SubmitError>;

    /// Report an infrastructure failure to the operator.
    async fn notify_operator(&self, message: &str) -> Result<(), SubmitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: &str, content: &str, files: &[&str]) -> IncomingMessage {
        IncomingMessage {
            author: author.into(),
            channel: "uploads".into(),
            content: content.into(),
            attachments: files
                .iter()
                .map(|f| Attachment {
                    filename: f.to_string(),
                    bytes: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_prompt_tokens() {
        let p = Prompt::MissingServerConfig;
        assert_eq!(p.resolve(TOKEN_OFFICIAL), Some(Choice::TreatAsOfficial));
        assert_eq!(p.resolve(TOKEN_YES), Some(Choice::SupplyServerConfig));
        assert_eq!(p.resolve(TOKEN_NO), Some(Choice::Cancel));
        assert_eq!(p.resolve("\u{1F44D}"), None);

        assert_eq!(Prompt::Platform.resolve(TOKEN_YES), Some(Choice::Singleplayer));
        assert_eq!(Prompt::Platform.resolve(TOKEN_NO), Some(Choice::Server));
        assert_eq!(Prompt::Platform.resolve(TOKEN_OFFICIAL), None);
        assert!(Prompt::Platform.text().contains(TOKEN_YES));
    }

    #[test]
    fn test_file_request_predicate() {
        let req = FileRequest::game_ini(&Submitter::new("42", "uploads"));
        assert!(req.matches(&message("42", "here is my GAME file", &["Game.ini"])));

        assert!(!req.matches(&message("7", "game", &["Game.ini"])));
        assert!(!req.matches(&message("42", "config attached", &["Game.ini"])));
        assert!(!req.matches(&message("42", "game", &["game.ini"])));
        assert!(!req.matches(&message("42", "game", &[])));
        assert!(!req.matches(&message("42", "game", &["Game.ini", "Game.ini"])));

        let mut other_channel = message("42", "game", &["Game.ini"]);
        other_channel.channel = "general".into();
        assert!(!req.matches(&other_channel));
    }
}
