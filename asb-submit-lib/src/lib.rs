//! Submission processing for creature exports.
//!
//! A submission is a zip archive of `DinoExport*.ini` files plus an optional
//! `Game.ini`. [`Workflow::run`] takes one archive through intake,
//! interactive profile resolution and publishing into versioned storage.

pub mod archive;
pub mod context;
pub mod error;
pub mod git;
pub mod settings;
pub mod storage;
pub mod transport;
pub mod workflow;

pub use archive::{ArchiveContents, ArchiveFile, GAME_INI, read_archive};
pub use context::{OFFICIAL, SubmissionSession, SubmissionState, UNOFFICIAL};
pub use error::SubmitError;
pub use git::GitStorage;
pub use settings::{Settings, settings_path};
pub use storage::{OutputFile, PublishLock, Storage, SyncResult};
pub use transport::{
    Attachment, Choice, FileRequest, IncomingMessage, Prompt, Submitter, Transport,
};
pub use workflow::{SubmissionOutcome, SubmissionRequest, Workflow};
