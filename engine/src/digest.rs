//! Streaming SHA-256 hashing for resolved artifacts.
//!
//! Files are read in bounded chunks and fed incrementally into the digest
//! accumulator, so artifacts of any size hash in constant memory. The result
//! is a validated 64-character lowercase hex string.

use crate::error::{IntegrityError, Result};
use camino::Utf8Path;
use log::trace;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use thiserror::Error;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Number of bytes read from an artifact per hashing step.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Reasons digest text is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestFormatError {
    /// The text is not exactly 64 characters long.
    #[error("expected {DIGEST_HEX_LEN} hex characters, got {actual}")]
    Length {
        /// Length of the rejected text.
        actual: usize,
    },

    /// The text contains a character outside `0-9a-f`.
    #[error("non-hex character '{character}'")]
    NonHex {
        /// The first offending character.
        character: char,
    },

    /// The text uses uppercase hex digits.
    #[error("digest must be lowercase")]
    Uppercase,
}

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use depseal_engine::digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest: Sha256Digest = hex.as_str().try_into().unwrap();
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report whether `expected` names this digest, ignoring hex case.
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        self.0.eq_ignore_ascii_case(expected)
    }

    fn from_hasher(hasher: Sha256) -> Self {
        // `LowerHex` on the finalised output is always 64 lowercase hex chars.
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = DigestFormatError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> std::result::Result<(), DigestFormatError> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(DigestFormatError::Length {
            actual: value.len(),
        });
    }
    if let Some(character) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(DigestFormatError::NonHex { character });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(DigestFormatError::Uppercase);
    }
    Ok(())
}

/// Hash everything `reader` yields, reading at most `chunk_size` bytes at a
/// time.
///
/// The digest depends only on the bytes read, never on how they were
/// chunked. A `chunk_size` of zero is treated as one.
///
/// # Errors
///
/// Returns the underlying [`std::io::Error`] if a read fails for any reason
/// other than interruption.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> std::io::Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(Sha256Digest::from_hasher(hasher))
}

/// Compute the SHA-256 digest of the artifact at `path`.
///
/// The file is opened read-only and closed before this function returns.
///
/// # Errors
///
/// Returns [`IntegrityError::UnreadableArtifact`] tagged with `path` if the
/// file cannot be opened or read.
pub fn hash_file(path: &Utf8Path) -> Result<Sha256Digest> {
    let unreadable = |source| IntegrityError::UnreadableArtifact {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let digest = hash_reader(file, HASH_CHUNK_SIZE).map_err(unreadable)?;
    trace!("hashed {path}: {digest}");
    Ok(digest)
}
