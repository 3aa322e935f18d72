use thiserror::Error;

use asb_submit_core::FormatError;
use asb_submit_ini::IniError;
use asb_submit_lib::{SubmissionState, SubmitError};
use asb_submit_records::ExtractionError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("{0}")]
    Ini(#[from] IniError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The submission ended without being published
    #[error("Submission ended as {0}")]
    Unpublished(SubmissionState),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
