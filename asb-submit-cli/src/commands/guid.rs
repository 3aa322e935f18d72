use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use asb_submit_core::Guid;
use asb_submit_ini::decode;
use asb_submit_records::content_guid;

use crate::error::CliError;

pub(crate) fn run_guid_ids(id1: u128, id2: u128) -> Result<(), CliError> {
    log::info!("{}", Guid::from_int_pair(id1, id2)?);
    Ok(())
}

pub(crate) fn run_guid_parse(value: &str) -> Result<(), CliError> {
    let guid: Guid = value.parse()?;
    let (a, b, c) = guid.head();
    let tail: Vec<String> = guid.tail().iter().map(|x| format!("{x:02x}")).collect();

    log::info!("{}", guid.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  fields: {a:08x} {b:04x} {c:04x} {}", tail.join(" "));
    let bytes: Vec<String> = guid.to_bytes().iter().map(|x| format!("{x:02x}")).collect();
    log::info!("  bytes:  {}", bytes.join(""));
    log::info!("  hash:   {:#010x}", guid.hash_code());
    if guid.is_empty() {
        log::info!("  {}", "(empty)".if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

pub(crate) fn run_guid_random(count: usize) {
    for _ in 0..count {
        log::info!("{}", Guid::random());
    }
}

/// The identifier a submission with this `Game.ini` would be filed under.
pub(crate) fn run_guid_content(file: &Path) -> Result<(), CliError> {
    let bytes = std::fs::read(file)?;
    let text = decode(&bytes)?;
    log::info!("{}", content_guid(&text));
    Ok(())
}
