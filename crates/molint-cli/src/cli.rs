use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Molint CLI - Inspect the interaction families and parameter sets used by the Molint non-covalent interaction engine.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered interaction families with their parameter schemas.
    Families(FamiliesArgs),
    /// Load, merge and validate an interaction parameter set, then print it as TOML.
    Params(ParamsArgs),
}

/// Arguments for the `families` subcommand.
#[derive(Args, Debug, Default)]
pub struct FamiliesArgs {
    /// Only show the named family (e.g., 'hydrogen-bonds').
    #[arg(value_name = "FAMILY")]
    pub family: Option<String>,
}

/// Arguments for the `params` subcommand.
#[derive(Args, Debug, Default)]
pub struct ParamsArgs {
    /// Path to a parameter file in TOML format. Defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable only the listed families, disabling every other one.
    #[arg(long, value_name = "FAMILY", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Disable the listed families.
    #[arg(long, value_name = "FAMILY", value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Skip the refinement pass, overriding the parameter file.
    #[arg(long)]
    pub no_refine: bool,

    /// Set a specific parameter value, overriding the parameter file.
    /// Can be used multiple times. Example: -S hydrogen-bonds.distance-max=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Write the resolved parameters to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
