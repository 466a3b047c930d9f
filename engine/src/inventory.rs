//! Inventory construction over resolved dependency scopes.
//!
//! [`InventoryBuilder`] walks scopes in the order the host supplies them
//! (declaration order), then artifacts in resolution order, and produces one
//! `DependencyKey -> digest` mapping iterated in canonical key order.
//!
//! Duplicate keys are resolved first-seen-wins: once a key is present, later
//! occurrences in the same or subsequent scopes are neither hashed nor
//! inserted.

use crate::digest::{Sha256Digest, hash_file};
use crate::error::{IntegrityError, Result};
use crate::key::{DependencyKey, derive_key};
use crate::scope::{ExclusionSet, ProjectContext, ResolvedArtifact, ScopeListing, canonical_or_given};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Freshly computed digests for the current resolved dependency set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    entries: BTreeMap<DependencyKey, Sha256Digest>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `digest` for `key` unless the key is already present.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert_if_absent(&mut self, key: DependencyKey, digest: Sha256Digest) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(digest);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Look up the digest recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &DependencyKey) -> Option<&Sha256Digest> {
        self.entries.get(key)
    }

    /// Return true when `key` has a recorded digest.
    #[must_use]
    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true when no artifact was inventoried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&DependencyKey, &Sha256Digest)> {
        self.entries.iter()
    }
}

impl FromIterator<(DependencyKey, Sha256Digest)> for Inventory {
    /// Collect entries with the same first-seen-wins rule as the builder.
    fn from_iter<I: IntoIterator<Item = (DependencyKey, Sha256Digest)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (key, digest) in iter {
            inventory.insert_if_absent(key, digest);
        }
        inventory
    }
}

/// Builds an [`Inventory`] from scope listings.
///
/// The exclusion set is supplied at construction; the builder performs no
/// ambient configuration lookup.
#[derive(Debug, Clone)]
pub struct InventoryBuilder {
    project: ProjectContext,
    project_root: Utf8PathBuf,
    exclusions: ExclusionSet,
}

impl InventoryBuilder {
    /// Create a builder for `project` that skips the scopes in `exclusions`.
    ///
    /// The project directory is canonicalised once. A directory that does not
    /// exist is kept as given, provided it is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::InvalidProjectDir`] if the directory is empty
    /// or relative and cannot be canonicalised, or if it resolves to the
    /// filesystem root. Either would classify every artifact as a local
    /// output.
    pub fn new(project: ProjectContext, exclusions: ExclusionSet) -> Result<Self> {
        let project_root = resolve_project_root(&project.dir)?;
        Ok(Self {
            project,
            project_root,
            exclusions,
        })
    }

    /// Build the inventory for `scopes`, processed in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IntegrityError::MalformedCachePath`] when an artifact
    /// path does not follow the cache layout, or
    /// [`crate::IntegrityError::UnreadableArtifact`] when an artifact cannot
    /// be hashed. No partial inventory is returned.
    pub fn build<'a, I>(&self, scopes: I) -> Result<Inventory>
    where
        I: IntoIterator<Item = &'a ScopeListing>,
    {
        let mut inventory = Inventory::new();
        for scope in scopes {
            self.add_scope(&mut inventory, scope)?;
        }
        debug!(
            "inventoried {} artifact(s) for project {}",
            inventory.len(),
            self.project.name
        );
        Ok(inventory)
    }

    fn add_scope(&self, inventory: &mut Inventory, scope: &ScopeListing) -> Result<()> {
        if self.exclusions.is_excluded(&self.project.name, &scope.name) {
            debug!("skipping excluded scope {}:{}", self.project.name, scope.name);
            return Ok(());
        }
        if !scope.resolvable {
            debug!("skipping unresolvable scope {}:{}", self.project.name, scope.name);
            return Ok(());
        }
        for artifact in &scope.artifacts {
            self.add_artifact(inventory, artifact)?;
        }
        Ok(())
    }

    fn add_artifact(&self, inventory: &mut Inventory, artifact: &ResolvedArtifact) -> Result<()> {
        if artifact.is_project_reference() {
            debug!("skipping project reference {}", artifact.path);
            return Ok(());
        }
        if self.is_local_output(artifact) {
            debug!("skipping local build output {}", artifact.path);
            return Ok(());
        }
        let key = derive_key(&artifact.path)?;
        if inventory.contains(&key) {
            return Ok(());
        }
        let digest = hash_file(&artifact.path)?;
        inventory.insert_if_absent(key, digest);
        Ok(())
    }

    fn is_local_output(&self, artifact: &ResolvedArtifact) -> bool {
        canonical_or_given(&artifact.path).starts_with(&self.project_root)
    }
}

fn resolve_project_root(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let invalid = |reason: &'static str| IntegrityError::InvalidProjectDir {
        dir: dir.to_owned(),
        reason,
    };
    let root = match dir.canonicalize_utf8() {
        Ok(canonical) => canonical,
        Err(_) if dir.is_absolute() => dir.to_owned(),
        Err(_) => return Err(invalid("a path that does not exist must be absolute")),
    };
    if root.parent().is_none() {
        return Err(invalid("the filesystem root contains every artifact"));
    }
    Ok(root)
}
