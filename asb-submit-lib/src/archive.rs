//! Zip intake: pull the recognized `.ini` members out of a submission.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::SubmitError;

/// File name of the server configuration.
pub const GAME_INI: &str = "Game.ini";
const DINO_EXPORT_MARKER: &str = "DinoExport";

/// Largest member read out of a submission. Export files are a few KiB.
pub const MAX_MEMBER_SIZE: u64 = 16 * 1024 * 1024;

/// One recognized member, named by its base name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Recognized members of a submission archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveContents {
    pub game_ini: Option<ArchiveFile>,
    pub dino_files: Vec<ArchiveFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    GameIni,
    DinoExport,
}

/// Classify a member by base name. Only `.ini` files count: `game.ini` in
/// any case, or any name containing `DinoExport`.
pub fn classify(name: &str) -> Option<MemberKind> {
    if !name.to_ascii_lowercase().ends_with(".ini") {
        return None;
    }
    if name.eq_ignore_ascii_case(GAME_INI) {
        Some(MemberKind::GameIni)
    } else if name.contains(DINO_EXPORT_MARKER) {
        Some(MemberKind::DinoExport)
    } else {
        None
    }
}

/// Whether an uploaded file name looks like a zip archive.
pub fn is_zip_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".zip")
}

/// Read every recognized member. Directory entries and `__MACOSX` resource
/// forks are skipped; a repeated base name keeps the last copy.
pub fn read_archive(bytes: &[u8]) -> Result<ArchiveContents, SubmitError> {
    read_archive_with_limit(bytes, MAX_MEMBER_SIZE)
}

/// [`read_archive`] with an explicit per-member size limit. A member that
/// inflates past `limit` fails with [`SubmitError::MemberTooLarge`].
pub fn read_archive_with_limit(bytes: &[u8], limit: u64) -> Result<ArchiveContents, SubmitError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut contents = ArchiveContents::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let full_name = entry.name().to_string();
        if entry.is_dir() || full_name.starts_with("__MACOSX/") {
            continue;
        }
        let name = base_name(&full_name).to_string();
        let Some(kind) = classify(&name) else {
            log::debug!("Skipping archive member {full_name}");
            continue;
        };

        // The header size is whatever the uploader wrote.
        let mut data = Vec::with_capacity(initial_capacity(entry.size(), limit));
        entry.by_ref().take(limit.saturating_add(1)).read_to_end(&mut data)?;
        if data.len() as u64 > limit {
            return Err(SubmitError::MemberTooLarge {
                name: full_name,
                limit,
            });
        }
        let file = ArchiveFile { name, bytes: data };

        match kind {
            MemberKind::GameIni => {
                if contents.game_ini.is_some() {
                    log::warn!("Archive has more than one Game.ini, using {full_name}");
                }
                contents.game_ini = Some(file);
            }
            MemberKind::DinoExport => {
                if let Some(pos) = contents.dino_files.iter().position(|f| f.name == file.name) {
                    log::warn!("Duplicate export {}, using {full_name}", file.name);
                    contents.dino_files[pos] = file;
                } else {
                    contents.dino_files.push(file);
                }
            }
        }
    }
    Ok(contents)
}

fn initial_capacity(declared: u64, limit: u64) -> usize {
    usize::try_from(declared.min(limit)).unwrap_or(0)
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Copy an incoming archive into `dir` as `{stem}_{YYYYmmddTHHMMSS}.zip`.
pub fn retain_archive(
    dir: &Path,
    archive_name: &str,
    bytes: &[u8],
    received_at: DateTime<Local>,
) -> Result<PathBuf, SubmitError> {
    std::fs::create_dir_all(dir)?;
    let base = base_name(archive_name);
    let stem = base
        .strip_suffix(".zip")
        .or_else(|| base.strip_suffix(".ZIP"))
        .unwrap_or(base);
    let path = dir.join(format!(
        "{stem}_{}.zip",
        received_at.format("%Y%m%dT%H%M%S")
    ));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
