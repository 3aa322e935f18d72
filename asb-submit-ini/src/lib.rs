//! Text normalization for uploaded `.ini` fragments.
//!
//! Raw file bytes go through four steps: [`decode`] (UTF-8, falling back to
//! UTF-16LE), [`strip_noise`] (drop lines containing configured substrings),
//! [`parse`] (sectioned key/value document) and [`reclassify`] (keep only
//! allow-listed sections, fixing up their casing). [`normalize`] runs all
//! four with a [`NormalizerRules`] set.

pub mod decode;
pub mod document;
pub mod error;
pub mod normalize;

pub use decode::decode;
pub use document::{IniDocument, Section, parse};
pub use error::IniError;
pub use normalize::{
    MOD_MARKER, Normalized, NormalizerRules, normalize, reclassify, scan_mod_ids, strip_noise,
    title_case,
};
