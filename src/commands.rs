//! Command handlers for `depseal verify` and `depseal generate`.
//!
//! Handlers write their report to an injected sink so they can be exercised
//! without a terminal. Errors are returned to the entrypoint, which maps them
//! to a non-zero exit code.

use crate::cli::{Cli, Command, GenerateArgs, ListingArgs, VerifyArgs};
use crate::config::{DepsealConfig, Overrides};
use crate::error::{DepsealError, Result};
use crate::listing::ResolvedListing;
use camino::Utf8Path;
use depseal_engine::{Inventory, InventoryBuilder, Manifest, VerificationOutcome, render_document, verify};
use log::{debug, info};
use std::fmt::Display;
use std::io::Write;

/// Load configuration and dispatch the selected subcommand.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the subcommand
/// fails.
pub fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = DepsealConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Command::Verify(args) => run_verify(args, config, stdout).map(|_| ()),
        Command::Generate(args) => run_generate(args, config, stdout),
    }
}

/// Verify the resolved artifacts against the configured manifest.
///
/// With no manifest configured, or an empty one, the run succeeds and
/// reports that verification is not configured. `--verbose` adds one line
/// per verified artifact before the summary.
///
/// # Errors
///
/// Returns an error if:
/// - No listing is configured, or it cannot be read or parsed
/// - The manifest cannot be read or has a malformed entry
/// - An artifact path is malformed or unreadable
/// - An artifact is unpinned or its digest does not match its pin
/// - Writing to stdout fails
pub fn run_verify(
    args: &VerifyArgs,
    config: DepsealConfig,
    stdout: &mut dyn Write,
) -> Result<VerificationOutcome> {
    let settings = config.with_overrides(&Overrides {
        manifest: args.manifest.as_deref(),
        ..listing_overrides(&args.inputs)
    });
    let inventory = build_inventory(&settings)?;
    let manifest = load_manifest(settings.manifest.as_deref())?;
    let outcome = verify(&inventory, &manifest)?;

    if args.verbose {
        for artifact in outcome.verified() {
            write_line(stdout, artifact)?;
        }
    }
    write_line(stdout, &outcome)?;
    Ok(outcome)
}

/// Print a manifest document pinning every resolved artifact, and write it
/// to `--output` when given.
///
/// # Errors
///
/// Returns an error if the inventory cannot be built, or if writing the
/// document to stdout or to the output file fails.
pub fn run_generate(
    args: &GenerateArgs,
    config: DepsealConfig,
    stdout: &mut dyn Write,
) -> Result<()> {
    let settings = config.with_overrides(&listing_overrides(&args.inputs));
    let inventory = build_inventory(&settings)?;
    let document = render_document(&inventory);

    write!(stdout, "{document}").map_err(|source| DepsealError::WriteFailed { source })?;

    if let Some(path) = args.output.as_deref() {
        std::fs::write(path, &document).map_err(|source| DepsealError::ManifestWrite {
            path: path.to_owned(),
            source,
        })?;
        info!("wrote {} pinned artifact(s) to {path}", inventory.len());
    }
    Ok(())
}

fn listing_overrides(inputs: &ListingArgs) -> Overrides<'_> {
    Overrides {
        excluded_scopes: inputs.exclude.as_deref(),
        manifest: None,
        listing: inputs.listing.as_deref(),
    }
}

fn build_inventory(settings: &DepsealConfig) -> Result<Inventory> {
    let listing = ResolvedListing::from_file(settings.listing_path()?)?;
    let builder = InventoryBuilder::new(listing.project, settings.exclusions())?;
    Ok(builder.build(&listing.scopes)?)
}

fn load_manifest(path: Option<&Utf8Path>) -> Result<Manifest> {
    let Some(manifest_path) = path else {
        debug!("no manifest configured");
        return Ok(Manifest::default());
    };
    let text = std::fs::read_to_string(manifest_path).map_err(|source| {
        DepsealError::ManifestRead {
            path: manifest_path.to_owned(),
            source,
        }
    })?;
    Ok(Manifest::parse_document(&text)?)
}

fn write_line(stdout: &mut dyn Write, message: &dyn Display) -> Result<()> {
    writeln!(stdout, "{message}").map_err(|source| DepsealError::WriteFailed { source })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
