//! Verification of an inventory against a trusted manifest.
//!
//! Every inventoried artifact must be pinned, and its pinned digest must
//! match the computed one. Manifest entries for artifacts that are no longer
//! resolved are inert: they are neither verified nor reported.
//!
//! Verification fails fast on the first violation in canonical key order.

use crate::digest::Sha256Digest;
use crate::error::{IntegrityError, Result};
use crate::inventory::Inventory;
use crate::key::DependencyKey;
use crate::manifest::Manifest;
use log::info;
use std::fmt;

/// Record of one artifact whose digest matched its pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtifact {
    /// Canonical key of the verified artifact.
    pub key: DependencyKey,
    /// The matching digest.
    pub digest: Sha256Digest,
}

impl fmt::Display for VerifiedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "verified {} ({})", self.key, self.digest)
    }
}

/// Outcome of a verification run that found no violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The manifest pins nothing, so verification has not been set up yet.
    ///
    /// This is not the same as every artifact being verified.
    NotConfigured,
    /// Every inventoried artifact matched its pin, in canonical key order.
    Verified(Vec<VerifiedArtifact>),
}

impl VerificationOutcome {
    /// Artifacts that were checked, empty when verification is not
    /// configured.
    #[must_use]
    pub fn verified(&self) -> &[VerifiedArtifact] {
        match self {
            Self::NotConfigured => &[],
            Self::Verified(artifacts) => artifacts,
        }
    }

    /// Return true when a non-empty manifest was applied.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => {
                write!(f, "dependency verification not configured: manifest is empty")
            }
            Self::Verified(artifacts) => {
                write!(f, "verified {} dependency artifact(s)", artifacts.len())
            }
        }
    }
}

/// Check every inventoried artifact against `manifest`.
///
/// # Errors
///
/// Returns [`IntegrityError::MissingAssertion`] for the first artifact in
/// canonical order with no pin, or [`IntegrityError::DigestMismatch`] for the
/// first whose pin disagrees with its computed digest, whichever comes first.
///
/// # Examples
///
/// ```
/// use depseal_engine::{Inventory, Manifest, VerificationOutcome, verify};
///
/// let outcome = verify(&Inventory::new(), &Manifest::default()).unwrap();
/// assert_eq!(outcome, VerificationOutcome::NotConfigured);
/// ```
pub fn verify(inventory: &Inventory, manifest: &Manifest) -> Result<VerificationOutcome> {
    if manifest.is_empty() {
        info!("dependency verification not configured; manifest is empty");
        return Ok(VerificationOutcome::NotConfigured);
    }
    let mut verified = Vec::with_capacity(inventory.len());
    for (key, digest) in inventory.iter() {
        let Some(expected) = manifest.expected_digest(key) else {
            return Err(IntegrityError::MissingAssertion { key: key.clone() });
        };
        if !digest.matches(expected) {
            return Err(IntegrityError::DigestMismatch {
                key: key.clone(),
                expected: expected.to_owned(),
                actual: digest.clone(),
            });
        }
        info!("verified {key}: {digest}");
        verified.push(VerifiedArtifact {
            key: key.clone(),
            digest: digest.clone(),
        });
    }
    Ok(VerificationOutcome::Verified(verified))
}
