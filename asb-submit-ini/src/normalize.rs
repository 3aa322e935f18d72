use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::decode::decode;
use crate::document::{IniDocument, Section, parse};
use crate::error::IniError;

/// Line prefix carrying the explicit list of active modifications.
pub const MOD_MARKER: &str = "ModIDS=";

/// Normalization rules for one file type.
///
/// These are supplied by configuration; the normalizer has no built-in
/// knowledge of which sections matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerRules {
    /// Lines containing any of these (case-insensitive) are dropped.
    #[serde(default)]
    pub ignore_strings: Vec<String>,
    /// Canonical section names that survive reclassification.
    #[serde(default)]
    pub keep_blocks: BTreeSet<String>,
}

impl NormalizerRules {
    pub fn new<I, J, S, T>(ignore_strings: I, keep_blocks: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            ignore_strings: ignore_strings.into_iter().map(Into::into).collect(),
            keep_blocks: keep_blocks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Output of [`normalize`] for one file.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Decoded text, before noise stripping.
    pub text: String,
    /// Reclassified document.
    pub document: IniDocument,
    /// Mod ids from [`MOD_MARKER`] lines, if any were present.
    pub mod_ids: Option<Vec<String>>,
}

/// Run the full pipeline: decode, capture mod markers, strip noise, parse,
/// reclassify.
pub fn normalize(bytes: &[u8], rules: &NormalizerRules) -> Result<Normalized, IniError> {
    let text = decode(bytes)?;
    let mod_ids = scan_mod_ids(&text);
    let document = {
        let lines = strip_noise(&text, &rules.ignore_strings);
        reclassify(parse(lines), &rules.keep_blocks)
    };
    Ok(Normalized {
        text,
        document,
        mod_ids,
    })
}

/// Drop every line containing any of `ignore` (case-insensitive substring
/// match). Remaining lines keep their order.
pub fn strip_noise<'a, S: AsRef<str>>(text: &'a str, ignore: &[S]) -> Vec<&'a str> {
    let needles: Vec<String> = ignore
        .iter()
        .map(|s| s.as_ref().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            !needles.iter().any(|n| lower.contains(n.as_str()))
        })
        .collect()
}

/// Keep only sections whose name matches `keep_blocks`, trying the name as
/// is, then lowercased, then titlecased. A section matched by a casing
/// variant is renamed to that variant. Unmatched sections are dropped whole.
pub fn reclassify(doc: IniDocument, keep_blocks: &BTreeSet<String>) -> IniDocument {
    let mut out = IniDocument::new();
    for section in doc.into_sections() {
        let name = section.name();
        let canonical = if keep_blocks.contains(name) {
            Some(name.to_string())
        } else {
            let lower = name.to_lowercase();
            let title = title_case(name);
            if keep_blocks.contains(&lower) {
                Some(lower)
            } else if keep_blocks.contains(&title) {
                Some(title)
            } else {
                None
            }
        };

        match canonical {
            Some(canonical) if canonical == name => out.insert_section(section),
            Some(canonical) => {
                log::debug!("Renaming section [{name}] to [{canonical}]");
                let mut renamed = Section::new(canonical);
                for (k, v) in section.entries() {
                    renamed.set(k, v);
                }
                out.insert_section(renamed);
            }
            None => log::debug!("Dropping section [{name}]"),
        }
    }
    out
}

/// Titlecase the way most INI producers expect: the first letter of each
/// run of letters is uppercased, the rest lowercased.
///
/// `"max character status values"` → `"Max Character Status Values"`
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// Collect ids from every `ModIDS=a, b, c` line.
///
/// Returns `None` when no such line exists, so callers can tell "no marker"
/// apart from "marker with an empty list". Ids keep first-seen order and are
/// not repeated.
pub fn scan_mod_ids(text: &str) -> Option<Vec<String>> {
    let mut found = false;
    let mut ids: Vec<String> = Vec::new();
    for line in text.lines() {
        let Some(list) = line.trim_start().strip_prefix(MOD_MARKER) else {
            continue;
        };
        found = true;
        for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
    }
    found.then_some(ids)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
