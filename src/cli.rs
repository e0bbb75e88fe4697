//! CLI argument parsing module for bumper

use crate::config::parse_override;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a `NAME=VERSION` version override
fn parse_version_override(s: &str) -> Result<(String, String), String> {
    parse_override(s).map_err(|e| e.to_string())
}

/// Bump AUR packages to their latest upstream versions
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bumper",
    version,
    about = "Bump AUR packages to their latest upstream versions"
)]
pub struct CliArgs {
    /// Package directory, or a directory containing packages
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// How many directory levels to search for packages
    #[arg(short, long, default_value_t = 1)]
    pub depth: usize,

    /// Only check for updates, do not bump
    #[arg(long)]
    pub no_bump: bool,

    /// Do not build the bumped package
    #[arg(long)]
    pub no_make: bool,

    /// Do not commit the changes
    #[arg(long)]
    pub no_commit: bool,

    /// Push committed changes
    #[arg(long)]
    pub push: bool,

    /// Configuration file (default: $XDG_CONFIG_HOME/bumper/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use VERSION as the upstream version of package NAME
    #[arg(
        short = 'o',
        long = "override",
        value_name = "NAME=VERSION",
        value_parser = parse_version_override,
        action = ArgAction::Append
    )]
    pub overrides: Vec<(String, String)>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not display progress
    #[arg(short, long)]
    pub quiet: bool,
}

/// Steps selected for a run. Built once from the arguments and never
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub bump: bool,
    pub make: bool,
    pub commit: bool,
    pub push: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            bump: true,
            make: true,
            commit: true,
            push: false,
        }
    }
}

impl From<&CliArgs> for RunOptions {
    fn from(args: &CliArgs) -> Self {
        Self {
            bump: !args.no_bump,
            make: !args.no_make,
            commit: !args.no_commit,
            push: args.push,
        }
    }
}
