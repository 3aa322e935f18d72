/// Errors that can occur while processing a submission.
///
/// Terminal workflow outcomes such as a timeout or a rejected archive are
/// not errors; they are reported through
/// [`SubmissionState`](crate::SubmissionState).
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Archive member {name} is larger than {limit} bytes")]
    MemberTooLarge { name: String, limit: u64 },
}

impl SubmitError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
