//! Ordered sectioned key/value documents.
//!
//! Section and key order is preserved as first seen. Setting an existing
//! key replaces its value in place, which gives "last occurrence wins"
//! semantics for duplicate keys while keeping output order stable.

use std::fmt;

/// A single `[section]` with its ordered `key=value` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value. Replacing keeps the key's original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn absorb(&mut self, other: Section) {
        for (k, v) in other.entries {
            self.set(k, v);
        }
    }
}

/// An ordered collection of sections, as read from one `.ini` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the document has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Get a section, appending an empty one if it does not exist yet.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        let pos = match self.sections.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }

    /// Add a whole section; if one with the same name exists, entries are
    /// merged into it (incoming values win).
    pub fn insert_section(&mut self, section: Section) {
        match self.section_mut(&section.name) {
            Some(existing) => existing.absorb(section),
            None => self.sections.push(section),
        }
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(pos))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Set a value, creating the section when absent.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.add_section(section).set(key, value);
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

impl fmt::Display for IniDocument {
    /// Writes `[section]` headers and `key=value` lines (no spaces around
    /// the delimiter), each section followed by a blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (k, v) in &section.entries {
                writeln!(f, "{k}={v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse lines into a raw sectioned document.
///
/// - `[name]` starts a section; repeating a header continues that section
/// - `key=value` or `key: value` (first delimiter wins) adds an entry,
///   both sides trimmed; a later duplicate key replaces the earlier value
/// - blank lines and `#`/`;` comments are skipped
/// - entries before the first header and lines without a delimiter are
///   ignored
pub fn parse<I, S>(lines: I) -> IniDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut doc = IniDocument::new();
    let mut current: Option<usize> = None;

    for line in lines {
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(name) = section_header(trimmed) {
            doc.add_section(name);
            current = doc.sections.iter().position(|s| s.name == name);
            continue;
        }

        let Some(idx) = current else {
            log::debug!("Ignoring line outside any section: {trimmed:?}");
            continue;
        };

        match split_entry(trimmed) {
            Some((key, value)) => doc.sections[idx].set(key, value),
            None => log::debug!("Ignoring line without delimiter: {trimmed:?}"),
        }
    }

    doc
}

/// `[name]` → `name`, using the last `]` on the line.
fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let name = &rest[..end];
    if name.is_empty() { None } else { Some(name) }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
