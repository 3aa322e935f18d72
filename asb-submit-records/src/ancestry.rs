//! Lineage blocks: `[Dino Ancestry]` counts plus the optional
//! `[DinoAncestors]` / `[DinoAncestorsMale]` entry lists.

use asb_submit_core::Guid;
use asb_submit_ini::{IniDocument, Section};

use crate::error::ExtractionError;
use crate::fields;

pub const ANCESTRY_SECTION: &str = "Dino Ancestry";
pub const ANCESTORS_SECTION: &str = "DinoAncestors";
pub const MALE_ANCESTORS_SECTION: &str = "DinoAncestorsMale";

pub const COUNT_KEY: &str = "DinoAncestorsCount";
pub const MALE_COUNT_KEY: &str = "DinoAncestorsMale";

/// Keys of one ancestor entry, in the order they are written.
const ENTRY_KEYS: [&str; 6] = [
    "MaleName",
    "MaleDinoID1",
    "MaleDinoID2",
    "FemaleName",
    "FemaleDinoID1",
    "FemaleDinoID2",
];

/// A minimal record of a parent: enough to re-derive its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRecord {
    pub name: String,
    pub dino_id1: u64,
    pub dino_id2: u64,
    pub female: bool,
}

impl ParentRecord {
    /// The sentinel used when no lineage is known.
    pub fn empty(female: bool) -> Self {
        Self {
            female,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.dino_id1 == 0 && self.dino_id2 == 0
    }

    pub fn guid(&self) -> Guid {
        Guid::from_u64_pair(self.dino_id1, self.dino_id2)
    }
}

/// One breeding pair from an ancestry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorEntry {
    pub male: ParentRecord,
    pub female: ParentRecord,
}

impl AncestorEntry {
    /// Parse `MaleName=..;MaleDinoID1=..;MaleDinoID2=..;FemaleName=..;FemaleDinoID1=..;FemaleDinoID2=..`.
    ///
    /// Exactly six `key=value` pairs are required; empty segments (such as a
    /// trailing `;`) are ignored.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ExtractionError> {
        let malformed = || ExtractionError::ancestor(field, raw);
        let pairs = raw
            .split(';')
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(k, v)| (k.trim(), v.trim()))
                    .ok_or_else(malformed)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if pairs.len() != ENTRY_KEYS.len() {
            return Err(malformed());
        }
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .ok_or_else(malformed)
        };

        Ok(Self {
            male: ParentRecord {
                name: get("MaleName")?.to_string(),
                dino_id1: fields::id(field, get("MaleDinoID1")?)?,
                dino_id2: fields::id(field, get("MaleDinoID2")?)?,
                female: false,
            },
            female: ParentRecord {
                name: get("FemaleName")?.to_string(),
                dino_id1: fields::id(field, get("FemaleDinoID1")?)?,
                dino_id2: fields::id(field, get("FemaleDinoID2")?)?,
                female: true,
            },
        })
    }

    pub fn to_entry_string(&self) -> String {
        let values = [
            self.male.name.clone(),
            self.male.dino_id1.to_string(),
            self.male.dino_id2.to_string(),
            self.female.name.clone(),
            self.female.dino_id1.to_string(),
            self.female.dino_id2.to_string(),
        ];
        ENTRY_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Declared ancestor counts plus whatever entry lists were exported.
///
/// The counts are metadata from the game and are not required to match the
/// list lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ancestry {
    pub count: i64,
    pub male_count: i64,
    pub ancestors: Vec<AncestorEntry>,
    pub male_ancestors: Vec<AncestorEntry>,
}

impl Ancestry {
    pub fn from_document(doc: &IniDocument) -> Result<Self, ExtractionError> {
        let section = doc
            .section(ANCESTRY_SECTION)
            .ok_or_else(|| ExtractionError::missing_section(ANCESTRY_SECTION))?;
        let values: Vec<&str> = section.values().collect();
        let &[count, male_count] = values.as_slice() else {
            return Err(ExtractionError::cardinality(
                ANCESTRY_SECTION,
                "2",
                values.len(),
            ));
        };
        let count = fields::int(COUNT_KEY, count)?;
        let male_count = fields::int(MALE_COUNT_KEY, male_count)?;

        let ancestors = read_list(doc, ANCESTORS_SECTION, count)?;
        let male_ancestors = read_list(doc, MALE_ANCESTORS_SECTION, male_count)?;

        Ok(Self {
            count,
            male_count,
            ancestors,
            male_ancestors,
        })
    }

    /// Father and mother from the most recent entry, preferring the general
    /// list over the male line. Empty sentinels when neither list has one.
    pub fn parents(&self) -> (ParentRecord, ParentRecord) {
        match self.ancestors.last().or(self.male_ancestors.last()) {
            Some(entry) => (entry.male.clone(), entry.female.clone()),
            None => (ParentRecord::empty(false), ParentRecord::empty(true)),
        }
    }

    pub(crate) fn write_to(&self, doc: &mut IniDocument) {
        let block = doc.add_section(ANCESTRY_SECTION);
        block.set(COUNT_KEY, self.count.to_string());
        block.set(MALE_COUNT_KEY, self.male_count.to_string());
        for (name, list) in [
            (ANCESTORS_SECTION, &self.ancestors),
            (MALE_ANCESTORS_SECTION, &self.male_ancestors),
        ] {
            if list.is_empty() {
                continue;
            }
            let mut section = Section::new(name);
            for (i, entry) in list.iter().enumerate() {
                section.set(format!("{name}{i}"), entry.to_entry_string());
            }
            doc.insert_section(section);
        }
    }
}

/// Entries of one list section. A zero count skips the section entirely.
fn read_list(
    doc: &IniDocument,
    section_name: &str,
    count: i64,
) -> Result<Vec<AncestorEntry>, ExtractionError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let Some(section) = doc.section(section_name) else {
        return Ok(Vec::new());
    };
    let entries = section
        .entries()
        .map(|(key, value)| AncestorEntry::parse(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    if entries.len() as i64 != count {
        log::warn!(
            "[{section_name}] lists {} entries but the declared count is {count}",
            entries.len()
        );
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "tests/ancestry_tests.rs"]
mod tests;
