//! Error types for the depseal CLI.
//!
//! Host-side failures (configuration, listing, and manifest I/O) sit beside
//! the engine's [`IntegrityError`], which is wrapped unchanged so its message
//! still names the offending key or path.

use camino::Utf8PathBuf;
use depseal_engine::IntegrityError;
use thiserror::Error;

/// Errors that can occur while running a depseal command.
#[derive(Debug, Error)]
pub enum DepsealError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration {path}: {reason}")]
    InvalidConfig {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// A required setting was supplied neither on the command line nor in
    /// the configuration file.
    #[error("no {name} configured; pass {flag} or set `{name}` in depseal.toml")]
    MissingSetting {
        /// Configuration key of the missing setting.
        name: &'static str,
        /// Command-line flag that supplies the setting.
        flag: &'static str,
    },

    /// The resolved-artifact listing could not be read.
    #[error("failed to read artifact listing {path}")]
    ListingRead {
        /// Path of the listing file.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The resolved-artifact listing is not valid JSON or misses fields.
    #[error("invalid artifact listing {path}: {reason}")]
    InvalidListing {
        /// Path of the listing file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// The trusted manifest could not be read.
    #[error("failed to read manifest {path}")]
    ManifestRead {
        /// Path of the manifest file.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The regenerated manifest could not be written to disk.
    #[error("failed to write manifest {path}")]
    ManifestWrite {
        /// Destination path.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// Inventory construction, manifest parsing, or verification failed.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Result type alias using [`DepsealError`].
pub type Result<T> = std::result::Result<T, DepsealError>;
