//! asb-submit CLI
//!
//! Command-line front end for processing creature export submissions.

mod cli_types;
mod commands;
mod console;
mod error;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use asb_submit_lib::{Settings, settings_path};

use cli_types::{Cli, Commands, ConfigAction, GuidAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{} {e}", "\u{2718}".if_supports_color(Stdout, |t| t.red()));
        std::process::exit(1);
    }
}

/// Plain messages on stdout by default; `RUST_LOG` still applies on top.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli.settings.clone().unwrap_or_else(settings_path);
    let load = || -> Result<Settings, CliError> {
        let settings = Settings::load(&path)?;
        Ok(settings.with_overrides(cli.storage.clone(), cli.fallback.clone()))
    };

    match cli.command {
        Commands::Submit(args) => {
            let settings = load()?;
            let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
            rt.block_on(commands::submit::run_submit(settings, args))
        }
        Commands::Inspect { ref file } => commands::inspect::run_inspect(&load()?, file),
        Commands::Guid { ref action } => match action {
            GuidAction::Ids { id1, id2 } => commands::guid::run_guid_ids(*id1, *id2),
            GuidAction::Parse { value } => commands::guid::run_guid_parse(value),
            GuidAction::Random { count } => {
                commands::guid::run_guid_random(*count);
                Ok(())
            }
            GuidAction::Content { file } => commands::guid::run_guid_content(file),
        },
        Commands::Config { ref action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&path, &load()?),
            ConfigAction::Path => {
                commands::config::run_config_path(&path);
                Ok(())
            }
            ConfigAction::Init { force } => commands::config::run_config_init(&path, *force),
        },
    }
}
