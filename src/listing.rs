//! Resolved-artifact listing exported by the host build.
//!
//! The build writes one JSON document per project:
//!
//! ```json
//! {
//!   "project": { "name": "app", "dir": "/work/app" },
//!   "scopes": [
//!     {
//!       "name": "compileClasspath",
//!       "resolvable": true,
//!       "artifacts": [
//!         { "path": "/cache/acme/widget/1.0/0a1b/widget-1.0.jar", "version": "1.0" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Scope order in the document is the processing order, which decides which
//! scope wins when two resolve the same identity.

use crate::error::{DepsealError, Result};
use camino::Utf8Path;
use depseal_engine::{ProjectContext, ScopeListing};
use log::debug;
use serde::Deserialize;

/// One project's resolved scopes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedListing {
    /// The project the scopes belong to.
    pub project: ProjectContext,
    /// Scopes in processing order.
    #[serde(default)]
    pub scopes: Vec<ScopeListing>,
}

impl ResolvedListing {
    /// Read and parse the listing at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DepsealError::ListingRead`] if the file cannot be read and
    /// [`DepsealError::InvalidListing`] if it is not a valid listing.
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| DepsealError::ListingRead {
                path: path.to_owned(),
                source,
            })?;
        let listing = Self::from_json(&contents, path)?;
        debug!(
            "loaded {} scope(s) for project {} from {path}",
            listing.scopes.len(),
            listing.project.name
        );
        Ok(listing)
    }

    /// Parse listing JSON; `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`DepsealError::InvalidListing`] when `contents` is not a
    /// valid listing document.
    pub fn from_json(contents: &str, origin: &Utf8Path) -> Result<Self> {
        serde_json::from_str(contents).map_err(|err| DepsealError::InvalidListing {
            path: origin.to_owned(),
            reason: err.to_string(),
        })
    }
}
