use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use asb_submit_lib::Settings;

use crate::error::CliError;

/// Show the effective settings, overrides included.
pub(crate) fn run_config_show(path: &Path, settings: &Settings) -> Result<(), CliError> {
    let status = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "Settings file: {} {status}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("");
    log::info!("{}", settings.to_toml()?);
    Ok(())
}

pub(crate) fn run_config_path(path: &Path) {
    log::info!("{}", path.display());
}

/// Write the default settings, refusing to clobber an existing file unless
/// `force` is set.
pub(crate) fn run_config_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Settings::default().save(path)?;
    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
