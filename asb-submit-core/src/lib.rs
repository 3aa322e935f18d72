//! Shared building blocks for the submission service.
//!
//! The only domain type living here is [`Guid`], the 128-bit identifier
//! attached to every exported creature and to the server/session it came
//! from. Everything else in the workspace depends on this crate.

pub mod error;
pub mod guid;
pub mod util;

pub use error::FormatError;
pub use guid::{Guid, OFFICIAL_SERVER, OFFICIAL_SINGLEPLAYER};
