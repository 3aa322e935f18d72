//! Per-submission state, created when an archive arrives and dropped once
//! the workflow reaches a terminal state.

use std::fmt;

use chrono::{DateTime, Utc};

use asb_submit_core::Guid;
use asb_submit_ini::IniDocument;
use asb_submit_records::{DinoRecord, SessionRecord};

use crate::transport::Submitter;

/// Classification literals accepted from the submitter.
pub const OFFICIAL: &str = "official";
pub const UNOFFICIAL: &str = "unofficial";

/// Workflow states. See [`SubmissionState::is_terminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Received,
    Extracted,
    ResolvingProfile,
    ResolvingPlatform,
    Publishing,
    Published,
    /// Published to the local fallback instead of versioned storage.
    PublishedDegraded,
    Cancelled,
    TimedOut,
    Rejected,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Published
                | Self::PublishedDegraded
                | Self::Cancelled
                | Self::TimedOut
                | Self::Rejected
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct StateTransition {
    pub old_state: SubmissionState,
    pub new_state: SubmissionState,
    pub at: DateTime<Utc>,
}

/// One extracted export: the normalized document that gets published and
/// the record read from it.
#[derive(Debug, Clone)]
pub struct DinoSubmission {
    pub file_name: String,
    pub document: IniDocument,
    pub record: DinoRecord,
}

/// Everything the workflow knows about one submission.
#[derive(Debug)]
pub struct SubmissionSession {
    pub id: Guid,
    pub submitter: Submitter,
    pub state: SubmissionState,
    /// Classification literal as given; validated before publishing.
    pub official: String,
    pub singleplayer: bool,
    pub session: SessionRecord,
    pub dinos: Vec<DinoSubmission>,
    pub history: Vec<StateTransition>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SubmissionSession {
    pub fn new(submitter: Submitter, official: impl Into<String>, singleplayer: bool) -> Self {
        Self {
            id: Guid::random(),
            submitter,
            state: SubmissionState::Received,
            official: official.into(),
            singleplayer,
            session: SessionRecord::default(),
            dinos: Vec::new(),
            history: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn transition_to(&mut self, new_state: SubmissionState) {
        let transition = StateTransition {
            old_state: self.state,
            new_state,
            at: Utc::now(),
        };
        log::info!(
            "[{} {}] {} -> {}",
            self.submitter,
            self.id,
            transition.old_state,
            transition.new_state
        );
        self.state = new_state;
        if new_state.is_terminal() {
            self.ended_at = Some(transition.at);
        }
        self.history.push(transition);
    }

    /// States visited so far, starting with `Received`.
    pub fn path(&self) -> Vec<SubmissionState> {
        std::iter::once(SubmissionState::Received)
            .chain(self.history.iter().map(|t| t.new_state))
            .collect()
    }

    /// Directory label for the output: the session identifier.
    pub fn label(&self) -> String {
        self.session.guid.to_canonical_string()
    }

    pub fn is_official(&self) -> bool {
        self.official == OFFICIAL
    }
}
