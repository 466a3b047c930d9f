//! Error types for inventory construction, manifest parsing, and
//! verification.
//!
//! Every variant is fatal to a verification run. Messages name the offending
//! canonical key or path so a reviewer can decide whether to regenerate the
//! manifest or investigate the dependency.

use crate::digest::Sha256Digest;
use crate::key::DependencyKey;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while building, parsing, or verifying dependency pins.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// An artifact path does not follow the
    /// `group/name/version/contentHash/fileName` cache layout.
    #[error("artifact path {path} does not follow the dependency cache layout: {reason}")]
    MalformedCachePath {
        /// The rejected artifact path.
        path: Utf8PathBuf,
        /// Description of the layout violation.
        reason: String,
    },

    /// The project directory cannot bound local build outputs: it is empty
    /// or relative and does not resolve, or it is the filesystem root.
    #[error("project directory \"{dir}\" cannot identify local build outputs: {reason}")]
    InvalidProjectDir {
        /// The rejected project directory, as given.
        dir: Utf8PathBuf,
        /// Why the directory was rejected.
        reason: &'static str,
    },

    /// An artifact could not be read while computing its digest.
    #[error("failed to read artifact {path}")]
    UnreadableArtifact {
        /// Path of the unreadable artifact.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A manifest assertion is not a `group:name:version:fileTag:digest`
    /// tuple.
    #[error("malformed manifest entry \"{line}\"; expected group:name:version:fileTag:digest")]
    MalformedManifestEntry {
        /// The offending assertion, verbatim.
        line: String,
    },

    /// A resolved artifact has no pinned digest in the manifest.
    #[error("no manifest entry pins {key}; regenerate the manifest and review the new entry")]
    MissingAssertion {
        /// Canonical key of the unpinned artifact.
        key: DependencyKey,
    },

    /// The pinned digest disagrees with the computed digest.
    #[error("digest mismatch for {key}: manifest expects {expected}, artifact hashes to {actual}")]
    DigestMismatch {
        /// Canonical key of the mismatching artifact.
        key: DependencyKey,
        /// Digest recorded in the manifest.
        expected: String,
        /// Digest computed from the artifact contents.
        actual: Sha256Digest,
    },
}

/// Result type alias using [`IntegrityError`].
pub type Result<T> = std::result::Result<T, IntegrityError>;
