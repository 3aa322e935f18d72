//! Typed records extracted from normalized game exports.
//!
//! - [`DinoRecord`]: one creature from a `DinoExport*.ini` file
//! - [`SessionRecord`]: the server a submission came from (`Game.ini`)
//! - [`Ancestry`] and [`ParentRecord`]: lineage attached to a creature
//!
//! Extraction is all-or-nothing per file: any malformed part yields an
//! [`ExtractionError`] and no record.

pub mod ancestry;
pub mod color;
pub mod dino;
pub mod error;
pub mod fields;
pub mod session;
pub mod stats;

pub use ancestry::{AncestorEntry, Ancestry, ParentRecord};
pub use color::Color;
pub use dino::{DINO_FIELDS, DinoData, DinoRecord, GUID_KEY};
pub use error::{ExtractionError, ExtractionErrorKind};
pub use fields::{FieldKind, FieldValue};
pub use session::{
    GAME_MODE_SECTION, ModTable, SessionProfile, SessionRecord, content_guid, infer_mods,
};
pub use stats::{STAT_NAMES, Stats};
