//! CLI argument definitions for depseal.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint so the argument surface can be unit tested.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Verify resolved dependency artifacts against a trusted manifest.
#[derive(Parser, Debug)]
#[command(name = "depseal")]
#[command(version, about)]
#[command(long_about = concat!(
    "Verify resolved dependency artifacts against a trusted manifest.\n\n",
    "depseal reads the artifact listing exported by the build, hashes every ",
    "cached dependency with SHA-256, and compares each digest to the pin ",
    "recorded in a committed manifest. Any unpinned artifact or mismatched ",
    "digest fails the run.\n\n",
    "An empty manifest means verification is not configured yet; use ",
    "`depseal generate` to produce one from a trusted build.",
))]
#[command(after_help = concat!(
    "CONFIGURATION:\n",
    "  Settings are read from depseal.toml in the working directory, or from\n",
    "  the file named by --config. Flags override configured values.\n\n",
    "    excluded_scopes = \"testRuntimeClasspath, app:lintClasspath\"\n",
    "    manifest = \"gradle/dependency-verification.gradle\"\n",
    "    listing = \"build/depseal/listing.json\"\n\n",
    "EXAMPLES:\n",
    "  Verify the current build:\n",
    "    $ depseal verify --listing build/listing.json --manifest verify.gradle\n\n",
    "  Regenerate the manifest after an intended upgrade:\n",
    "    $ depseal generate --output verify.gradle\n",
))]
pub struct Cli {
    /// Configuration file [default: depseal.toml when present].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Verify every resolved artifact against the manifest.
    Verify(VerifyArgs),

    /// Print a manifest pinning every resolved artifact.
    Generate(GenerateArgs),
}

/// Inputs shared by both subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Resolved-artifact listing exported by the build.
    #[arg(long, value_name = "FILE")]
    pub listing: Option<Utf8PathBuf>,

    /// Comma-separated scopes to skip (`scope` or `project:scope`).
    #[arg(long, value_name = "SCOPES")]
    pub exclude: Option<String>,
}

/// Arguments for the verify command.
#[derive(Args, Debug, Clone, Default)]
pub struct VerifyArgs {
    /// Listing and exclusion inputs.
    #[command(flatten)]
    pub inputs: ListingArgs,

    /// Trusted manifest document.
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Report every verified artifact, not just the summary.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the generate command.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Listing and exclusion inputs.
    #[command(flatten)]
    pub inputs: ListingArgs,

    /// Also write the document to this file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
