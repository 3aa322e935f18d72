use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use asb_submit_ini::normalize;
use asb_submit_lib::archive::{MemberKind, classify, is_zip_name};
use asb_submit_lib::{ArchiveFile, Settings, read_archive};
use asb_submit_records::{DinoRecord, ParentRecord, SessionProfile, SessionRecord};

use crate::error::CliError;

/// Decode, normalize and extract a file the way a submission would, and
/// print what came out. Nothing is written.
pub(crate) fn run_inspect(settings: &Settings, file: &Path) -> Result<(), CliError> {
    let bytes = std::fs::read(file)?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if is_zip_name(&name) {
        let contents = read_archive(&bytes)?;
        let mut dinos = Vec::with_capacity(contents.dino_files.len());
        for member in &contents.dino_files {
            dinos.push(inspect_dino(settings, member)?);
        }
        match &contents.game_ini {
            Some(member) => inspect_game_ini(settings, member, &dinos)?,
            None => log::info!(
                "{}",
                "No Game.ini in archive".if_supports_color(Stdout, |t| t.yellow())
            ),
        }
        log::info!("{} DinoExport file(s)", dinos.len());
        return Ok(());
    }

    let member = ArchiveFile { name, bytes };
    match classify(&member.name) {
        Some(MemberKind::GameIni) => inspect_game_ini(settings, &member, &[]),
        Some(MemberKind::DinoExport) => inspect_dino(settings, &member).map(|_| ()),
        None => Err(CliError::config(format!(
            "{} is not a Game.ini, DinoExport*.ini or .zip file",
            member.name
        ))),
    }
}

fn inspect_dino(settings: &Settings, member: &ArchiveFile) -> Result<DinoRecord, CliError> {
    let normalized = normalize(&member.bytes, &settings.rules.dino_ini)?;
    let dino = DinoRecord::from_document(&normalized.document)
        .map_err(|e| e.with_file(&member.name))?;

    log::info!(
        "{} {}",
        member.name.if_supports_color(Stdout, |t| t.bold()),
        dino.guid.if_supports_color(Stdout, |t| t.cyan()),
    );
    for (field, value) in dino.data.fields() {
        log::info!("  {field:<24}{value}");
    }
    let colors: Vec<String> = dino.colors.iter().map(|c| c.to_rgba_string(true)).collect();
    if !colors.is_empty() {
        log::info!("  {:<24}{}", "Colors", colors.join(" "));
    }
    for (stat, value) in dino.stats.iter() {
        log::debug!("  {stat:<24}{value:.6}");
    }
    let (father, mother) = dino.parents();
    log::info!("  {:<24}{}", "Father", describe_parent(&father));
    log::info!("  {:<24}{}", "Mother", describe_parent(&mother));
    log::info!("");
    Ok(dino)
}

fn describe_parent(parent: &ParentRecord) -> String {
    if parent.is_empty() {
        "-".to_string()
    } else {
        format!("{} ({})", parent.name, parent.guid())
    }
}

fn inspect_game_ini(
    settings: &Settings,
    member: &ArchiveFile,
    dinos: &[DinoRecord],
) -> Result<(), CliError> {
    let normalized = normalize(&member.bytes, &settings.rules.game_ini)?;
    let session = SessionRecord::extract(
        normalized.document,
        Some(&normalized.text),
        normalized.mod_ids,
        dinos,
        &settings.mods,
        SessionProfile::Content,
    );

    log::info!(
        "{} {}",
        member.name.if_supports_color(Stdout, |t| t.bold()),
        session.guid.if_supports_color(Stdout, |t| t.cyan()),
    );
    if !session.has_config() {
        log::info!(
            "  {}",
            "no recognized sections".if_supports_color(Stdout, |t| t.yellow())
        );
    }
    for section in session.config.sections() {
        log::info!("  [{}] {} value(s)", section.name(), section.len());
    }
    if !session.mods.is_empty() {
        log::info!("  Mods: {}", session.mods.join(", "));
    }
    log::info!("");
    Ok(())
}
