//! Service settings (storage locations, normalizer rules, mod table).
//!
//! Read from `~/.config/asb-submit/settings.toml`. Every field is optional;
//! a missing file or field falls back to the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use asb_submit_ini::NormalizerRules;
use asb_submit_records::ModTable;
use asb_submit_records::ancestry::{ANCESTORS_SECTION, ANCESTRY_SECTION, MALE_ANCESTORS_SECTION};
use asb_submit_records::dino::{COLORIZATION_SECTION, DINO_DATA_SECTION};
use asb_submit_records::session::GAME_MODE_SECTION;
use asb_submit_records::stats::STATS_SECTION;

use crate::error::SubmitError;

/// Canonical path to the settings file: `~/.config/asb-submit/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("asb-submit").join("settings.toml")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Working copy of the versioned submissions repository.
    pub storage_root: PathBuf,
    /// Local directory used when publishing to `storage_root` fails.
    pub fallback_root: PathBuf,
    /// When set, every incoming archive is copied here untouched.
    pub archive_dir: Option<PathBuf>,
    /// Label of the operator channel that receives failure notices.
    pub operator: String,
    pub rules: FileRules,
    /// Class-name prefix → mod id.
    pub mods: ModTable,
    pub timeouts: Timeouts,
}

/// Normalizer rules per file type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRules {
    pub game_ini: NormalizerRules,
    pub dino_ini: NormalizerRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub choice_secs: u64,
    pub file_secs: u64,
}

impl Timeouts {
    pub fn choice(&self) -> Duration {
        Duration::from_secs(self.choice_secs)
    }

    pub fn file(&self) -> Duration {
        Duration::from_secs(self.file_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            choice_secs: 60,
            file_secs: 300,
        }
    }
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            game_ini: NormalizerRules::new(
                [
                    "ConfigOverrideItemCraftingCosts",
                    "ConfigOverrideSupplyCrateItems",
                    "ConfigOverrideNPCSpawnEntriesContainer",
                    "ConfigAddNPCSpawnEntriesContainer",
                    "ConfigSubtractNPCSpawnEntriesContainer",
                    "OverrideNamedEngramEntries",
                    "EngramEntryAutoUnlocks",
                ],
                [GAME_MODE_SECTION],
            ),
            dino_ini: NormalizerRules::new(
                Vec::<String>::new(),
                [
                    DINO_DATA_SECTION,
                    COLORIZATION_SECTION,
                    STATS_SECTION,
                    ANCESTRY_SECTION,
                    ANCESTORS_SECTION,
                    MALE_ANCESTORS_SECTION,
                ],
            ),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("../ASB_dino_submissions"),
            fallback_root: PathBuf::from("submissions_temp"),
            archive_dir: None,
            operator: "operator".to_string(),
            rules: FileRules::default(),
            mods: ModTable::new(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, SubmitError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_toml(&contents)
            .map_err(|e| SubmitError::settings(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(contents: &str) -> Result<Self, SubmitError> {
        toml::from_str(contents).map_err(|e| SubmitError::settings(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, SubmitError> {
        toml::to_string_pretty(self).map_err(|e| SubmitError::settings(e.to_string()))
    }

    /// Write settings atomically (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), SubmitError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, storage: Option<PathBuf>, fallback: Option<PathBuf>) -> Self {
        if let Some(p) = storage {
            self.storage_root = p;
        }
        if let Some(p) = fallback {
            self.fallback_root = p;
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
