use thiserror::Error;

/// Errors raised while constructing a [`Guid`](crate::Guid).
///
/// Construction is all-or-nothing: a value is either fully built or one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Raw byte input was not exactly 16 bytes long
    #[error("Identifier needs {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// Integer input does not fit any of the supported packings
    #[error("Value too large: {a:#x}, {b:#x} do not fit any identifier packing")]
    ValueTooLarge { a: u128, b: u128 },

    /// Canonical string input is malformed
    #[error(
        "Identifier string {0:?} is not formatted properly, must be in format \
         00000000-0000-0000-0000-000000000000"
    )]
    BadString(String),
}

impl FormatError {
    pub fn wrong_length(actual: usize) -> Self {
        Self::WrongLength {
            expected: 16,
            actual,
        }
    }

    pub fn value_too_large(a: u128, b: u128) -> Self {
        Self::ValueTooLarge { a, b }
    }

    pub fn bad_string(s: impl Into<String>) -> Self {
        Self::BadString(s.into())
    }
}
