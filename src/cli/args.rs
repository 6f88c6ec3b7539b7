//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Development build orchestrator CLI
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version (`-V` is verbose)
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Build once, start the server, then rebuild on every change
    #[command(visible_alias = "w")]
    Watch,

    /// Build once and exit
    #[command(visible_alias = "b")]
    Build,

    /// Start the server only
    #[command(visible_alias = "s")]
    Start,

    /// Minify existing client bundles
    #[command(visible_alias = "m")]
    Minify,

    /// Delete every build and public output
    #[command(visible_alias = "c")]
    Clean,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_v_is_verbose_long_version_prints_version() {
        let cli = Cli::try_parse_from(["kiln", "-V", "build"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Build);

        let err = Cli::try_parse_from(["kiln", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_aliases_and_global_flags() {
        let cli = Cli::try_parse_from(["kiln", "w", "-V"]).unwrap();
        assert_eq!(cli.command, Commands::Watch);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("kiln.toml"));

        let cli = Cli::try_parse_from(["kiln", "-C", "dev.toml", "clean"]).unwrap();
        assert_eq!(cli.command, Commands::Clean);
        assert_eq!(cli.config, PathBuf::from("dev.toml"));
    }

    #[test]
    fn test_subcommands_are_exclusive() {
        assert!(Cli::try_parse_from(["kiln", "build", "watch"]).is_err());
        assert!(Cli::try_parse_from(["kiln"]).is_err());
    }
}
