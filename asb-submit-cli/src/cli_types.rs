//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use asb_submit_lib::UNOFFICIAL;

#[derive(Parser)]
#[command(name = "asb-submit")]
#[command(about = "Process and publish creature export submissions", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/asb-submit/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Working copy of the submissions repository (overrides settings)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Directory used when publishing fails (overrides settings)
    #[arg(long, global = true)]
    pub fallback: Option<PathBuf>,

    /// Only show warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug logging with timestamps
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub(crate) struct SubmitArgs {
    /// Zip archive with DinoExport files and an optional Game.ini
    pub archive: PathBuf,

    /// "official" or "unofficial"
    #[arg(long, default_value = UNOFFICIAL)]
    pub official: String,

    /// The exports come from a singleplayer game
    #[arg(long)]
    pub singleplayer: bool,

    /// Submitter id used for the output directory
    #[arg(long, default_value = "local")]
    pub submitter: String,

    /// Channel label shown in logs
    #[arg(long, default_value = "console")]
    pub channel: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Process a submission archive and publish it
    Submit(SubmitArgs),

    /// Decode and extract a .ini file or a submission archive without publishing
    Inspect {
        /// A DinoExport*.ini, a Game.ini or a .zip archive
        file: PathBuf,
    },

    /// Identifier utilities
    Guid {
        #[command(subcommand)]
        action: GuidAction,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum GuidAction {
    /// Identifier of a creature from its DinoID1/DinoID2 pair
    Ids { id1: u128, id2: u128 },

    /// Validate a canonical identifier and show its parts
    Parse { value: String },

    /// Generate fresh identifiers
    Random {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Session identifier derived from a Game.ini
    Content { file: PathBuf },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_submit_defaults() {
        let cli = Cli::parse_from(["asb-submit", "submit", "upload.zip"]);
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.official, "unofficial");
        assert!(!args.singleplayer);
        assert_eq!(args.submitter, "local");
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from(["asb-submit", "config", "show", "--storage", "/srv/repo"]);
        assert_eq!(cli.storage, Some(PathBuf::from("/srv/repo")));
    }
}
