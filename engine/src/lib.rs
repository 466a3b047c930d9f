//! Dependency integrity verification engine.
//!
//! Pins the binary artifacts a build resolves from a dependency cache to a
//! committed, human-reviewed manifest of SHA-256 digests. The engine takes a
//! resolved-artifact listing as input, never resolves or fetches anything
//! itself, and reports results as values rather than console output.
//!
//! # Modules
//!
//! - [`digest`] - Streaming SHA-256 hashing and the `Sha256Digest` newtype
//! - [`error`] - Fatal verification error kinds
//! - [`inventory`] - Scope-then-artifact inventory construction
//! - [`key`] - Canonical artifact identities and cache-path derivation
//! - [`manifest`] - Manifest parsing and deterministic regeneration
//! - [`scope`] - Resolved-artifact listing types and scope exclusions
//! - [`verify`] - Inventory-against-manifest verification

pub mod digest;
pub mod error;
pub mod inventory;
pub mod key;
pub mod manifest;
pub mod scope;
pub mod verify;

pub use digest::{DigestFormatError, Sha256Digest};
pub use error::{IntegrityError, Result};
pub use inventory::{Inventory, InventoryBuilder};
pub use key::DependencyKey;
pub use manifest::{Manifest, render_document};
pub use scope::{ExclusionSet, ProjectContext, ResolvedArtifact, ScopeListing};
pub use verify::{VerificationOutcome, VerifiedArtifact, verify};
