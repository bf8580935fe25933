use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "eco",
    about = "EcoGuayaquil recycling rewards on a hash-chained ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Session configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Seed for the simulated collection-point sensor
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a scripted session: scans, redemptions, ledger, verification
    Demo(DemoArgs),
    /// Interactive session reading commands from stdin
    Shell,
    /// List redeemable rewards
    Catalog,
    /// List collection points
    Points,
    /// Verify a ledger exported as JSON
    Audit(AuditArgs),
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of simulated scans
    #[arg(short = 'n', long, default_value = "3")]
    pub scans: usize,
    /// Catalog item ids to redeem after scanning
    #[arg(long)]
    pub redeem: Vec<String>,
    /// Write the final ledger as JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args)]
pub struct AuditArgs {
    pub file: PathBuf,
    /// Show full digests instead of truncated ones
    #[arg(long)]
    pub full: bool,
}
