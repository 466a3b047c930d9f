//! Resolved-artifact listing types and scope exclusions.
//!
//! The host build system resolves every dependency scope and hands the engine
//! one [`ScopeListing`] per scope. Each listing carries its own resolvability
//! flag, computed once by the host, so the engine never probes scope
//! capabilities itself.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Declared version marking an intra-workspace project reference.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Separator between entries of an exclusion configuration string.
pub const EXCLUSION_SEPARATOR: char = ',';

/// The project whose dependencies are being verified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectContext {
    /// Project name, used for `project:scope` exclusions.
    pub name: String,
    /// Root of the project's own directory tree.
    pub dir: Utf8PathBuf,
}

/// One artifact resolved within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedArtifact {
    /// Absolute path of the artifact inside the dependency cache.
    pub path: Utf8PathBuf,
    /// Version string declared for the artifact.
    pub version: String,
}

impl ResolvedArtifact {
    /// Create an artifact entry.
    pub fn new(path: impl Into<Utf8PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Report whether this entry references another project in the same
    /// workspace rather than an external, cacheable dependency.
    #[must_use]
    pub fn is_project_reference(&self) -> bool {
        self.version == UNSPECIFIED_VERSION
    }
}

/// The resolved contents of one dependency scope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScopeListing {
    /// Scope name, for example `compileClasspath`.
    pub name: String,
    /// Whether the scope can be resolved in the current build phase.
    #[serde(default = "ScopeListing::resolvable_by_default")]
    pub resolvable: bool,
    /// Artifacts the scope resolved to, in resolution order.
    #[serde(default)]
    pub artifacts: Vec<ResolvedArtifact>,
}

impl ScopeListing {
    /// Create a resolvable scope listing.
    pub fn new(name: impl Into<String>, artifacts: Vec<ResolvedArtifact>) -> Self {
        Self {
            name: name.into(),
            resolvable: true,
            artifacts,
        }
    }

    /// Create a listing for a scope that was declared but never
    /// materialised.
    pub fn unresolvable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolvable: false,
            artifacts: Vec::new(),
        }
    }

    const fn resolvable_by_default() -> bool {
        true
    }
}

/// Scopes that are skipped before any resolution or hashing work.
///
/// Entries are either bare scope names, which match in every project, or
/// `project:scope` pairs, which match one project only.
///
/// # Examples
///
/// ```
/// use depseal_engine::scope::ExclusionSet;
///
/// let exclusions = ExclusionSet::parse("testRuntimeClasspath, app:lintClasspath");
/// assert!(exclusions.is_excluded("lib", "testRuntimeClasspath"));
/// assert!(exclusions.is_excluded("app", "lintClasspath"));
/// assert!(!exclusions.is_excluded("lib", "lintClasspath"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeSet<String>,
}

impl ExclusionSet {
    /// Parse a comma-separated exclusion string.
    ///
    /// Entries are trimmed and blank entries are ignored, so an empty string
    /// excludes nothing.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(EXCLUSION_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Report whether `scope` in `project` is excluded, either by bare name
    /// or by its `project:scope` form.
    #[must_use]
    pub fn is_excluded(&self, project: &str, scope: &str) -> bool {
        self.entries.contains(scope) || self.entries.contains(&format!("{project}:{scope}"))
    }

    /// Return true when nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the configured entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Canonical form of `path`, or `path` itself when it cannot be resolved.
pub(crate) fn canonical_or_given(path: &Utf8Path) -> Utf8PathBuf {
    path.canonicalize_utf8().unwrap_or_else(|_| path.to_owned())
}
