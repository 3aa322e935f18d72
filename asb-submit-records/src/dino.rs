//! Creature records read from `DinoExport*.ini` files.

use std::fmt;

use asb_submit_core::Guid;
use asb_submit_ini::IniDocument;

use crate::ancestry::{Ancestry, ParentRecord};
use crate::color::Color;
use crate::error::ExtractionError;
use crate::fields::{self, FieldValue};
use crate::stats::{STATS_SECTION, Stats};

pub const DINO_DATA_SECTION: &str = "Dino Data";
pub const COLORIZATION_SECTION: &str = "Colorization";

/// Keys written next to the positional data to carry the identifier.
/// They are not part of the positional layout and are skipped on read.
pub const GUID_KEY: &str = "Guid";
pub const EXPORT_GUID_KEY: &str = "ASMBot_GUID";

/// Names of the positional `[Dino Data]` fields.
pub const DINO_FIELDS: [&str; 14] = [
    "DinoID1",
    "DinoID2",
    "DinoClass",
    "DinoNameTag",
    "bIsFemale",
    "bNeutered",
    "TamerString",
    "TamedName",
    "ImprinterName",
    "RandomMutationsMale",
    "RandomMutationsFemale",
    "BabyAge",
    "CharacterLevel",
    "DinoImprintingQuality",
];

/// The fourteen positional fields of `[Dino Data]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DinoData {
    pub dino_id1: u64,
    pub dino_id2: u64,
    /// Blueprint class, e.g. `Rex_Character_BP_C`. Mod inference matches on it.
    pub dino_class: String,
    pub dino_name_tag: String,
    pub is_female: bool,
    pub neutered: bool,
    pub tamer: String,
    pub tamed_name: String,
    pub imprinter_name: String,
    pub random_mutations_male: i64,
    pub random_mutations_female: i64,
    pub baby_age: f64,
    pub level: i64,
    pub imprinting_quality: f64,
}

impl DinoData {
    fn from_values(values: &[&str]) -> Result<Self, ExtractionError> {
        if values.len() != DINO_FIELDS.len() {
            return Err(ExtractionError::cardinality(
                DINO_DATA_SECTION,
                DINO_FIELDS.len().to_string(),
                values.len(),
            ));
        }
        let id = |i: usize| fields::id(DINO_FIELDS[i], values[i]);
        let int = |i: usize| fields::int(DINO_FIELDS[i], values[i]);
        let float = |i: usize| fields::float(DINO_FIELDS[i], values[i]);
        let boolean = |i: usize| fields::boolean(DINO_FIELDS[i], values[i]);
        let text = |i: usize| values[i].trim().to_string();
        Ok(Self {
            dino_id1: id(0)?,
            dino_id2: id(1)?,
            dino_class: text(2),
            dino_name_tag: text(3),
            is_female: boolean(4)?,
            neutered: boolean(5)?,
            tamer: text(6),
            tamed_name: text(7),
            imprinter_name: text(8),
            random_mutations_male: int(9)?,
            random_mutations_female: int(10)?,
            baby_age: float(11)?,
            level: int(12)?,
            imprinting_quality: float(13)?,
        })
    }

    /// Field names paired with their typed values, in positional order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let values = [
            FieldValue::Id(self.dino_id1),
            FieldValue::Id(self.dino_id2),
            FieldValue::Text(self.dino_class.clone()),
            FieldValue::Text(self.dino_name_tag.clone()),
            FieldValue::Bool(self.is_female),
            FieldValue::Bool(self.neutered),
            FieldValue::Text(self.tamer.clone()),
            FieldValue::Text(self.tamed_name.clone()),
            FieldValue::Text(self.imprinter_name.clone()),
            FieldValue::Int(self.random_mutations_male),
            FieldValue::Int(self.random_mutations_female),
            FieldValue::Float(self.baby_age),
            FieldValue::Int(self.level),
            FieldValue::Float(self.imprinting_quality),
        ];
        DINO_FIELDS.into_iter().zip(values).collect()
    }
}

/// One exported creature.
///
/// Two records are equal when their identifiers, positional data and stats
/// match; colors and lineage are not compared.
#[derive(Debug, Clone)]
pub struct DinoRecord {
    pub data: DinoData,
    pub colors: Vec<Color>,
    pub stats: Stats,
    pub ancestry: Ancestry,
    pub guid: Guid,
}

impl DinoRecord {
    /// Extract a record from a normalized export.
    ///
    /// `[Dino Data]` needs exactly 14 values, `[Max Character Status Values]`
    /// at most 12 and `[Dino Ancestry]` exactly 2. `[Colorization]` is
    /// optional. Nothing is returned unless every part reads cleanly.
    pub fn from_document(doc: &IniDocument) -> Result<Self, ExtractionError> {
        let section = doc
            .section(DINO_DATA_SECTION)
            .ok_or_else(|| ExtractionError::missing_section(DINO_DATA_SECTION))?;
        let values: Vec<&str> = section
            .entries()
            .filter(|(k, _)| *k != GUID_KEY && *k != EXPORT_GUID_KEY)
            .map(|(_, v)| v)
            .collect();
        let data = DinoData::from_values(&values)?;

        let colors = match doc.section(COLORIZATION_SECTION) {
            Some(section) => section
                .entries()
                .map(|(k, v)| Color::parse(k, v))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let stats = doc
            .section(STATS_SECTION)
            .ok_or_else(|| ExtractionError::missing_section(STATS_SECTION))
            .and_then(|section| Stats::from_values(section.values()))?;

        let ancestry = Ancestry::from_document(doc)?;
        let guid = Guid::from_int_pair(data.dino_id1 as u128, data.dino_id2 as u128)?;

        Ok(Self {
            data,
            colors,
            stats,
            ancestry,
            guid,
        })
    }

    pub fn parents(&self) -> (ParentRecord, ParentRecord) {
        self.ancestry.parents()
    }

    pub fn name(&self) -> &str {
        &self.data.tamed_name
    }

    /// Re-render as an export document, with the identifier under
    /// [`EXPORT_GUID_KEY`].
    pub fn to_document(&self) -> IniDocument {
        let mut doc = IniDocument::new();

        let data = doc.add_section(DINO_DATA_SECTION);
        for (name, value) in self.data.fields() {
            data.set(name, value.to_string());
        }
        data.set(EXPORT_GUID_KEY, self.guid.to_string());

        let colors = doc.add_section(COLORIZATION_SECTION);
        for (i, color) in self.colors.iter().enumerate() {
            colors.set(format!("ColorSet[{i}]"), color.to_rgba_string(false));
        }

        let stats = doc.add_section(STATS_SECTION);
        for (name, value) in self.stats.iter() {
            stats.set(name, format!("{value:.6}"));
        }

        self.ancestry.write_to(&mut doc);
        doc
    }
}

impl PartialEq for DinoRecord {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid && self.data == other.data && self.stats == other.stats
    }
}

impl fmt::Display for DinoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, level {}, {})",
            self.data.tamed_name, self.data.dino_name_tag, self.data.level, self.guid
        )
    }
}

#[cfg(test)]
#[path = "tests/dino_tests.rs"]
mod tests;
