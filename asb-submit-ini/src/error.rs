/// Errors that can occur while normalizing a text file.
#[derive(Debug, thiserror::Error)]
pub enum IniError {
    #[error("Could not decode file as UTF-8 or UTF-16LE: {0}")]
    Decode(String),
}

impl IniError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
