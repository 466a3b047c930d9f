//! Project configuration loaded from `depseal.toml`.
//!
//! Settings live at the top level of the file. Every field is optional so a
//! project can rely on command-line flags alone, and unknown keys are
//! rejected so that typos surface instead of silently disabling exclusions.
//!
//! Command-line flags always win over values from the file; see
//! [`DepsealConfig::with_overrides`].

use crate::error::{DepsealError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use depseal_engine::ExclusionSet;
use log::debug;
use serde::Deserialize;
use std::io;

/// Configuration file discovered in the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "depseal.toml";

/// Settings shared by the `verify` and `generate` commands.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DepsealConfig {
    /// Comma-separated scopes to skip, either bare scope names or
    /// `project:scope` pairs.
    pub excluded_scopes: Option<String>,
    /// Path of the committed manifest document.
    pub manifest: Option<Utf8PathBuf>,
    /// Path of the resolved-artifact listing exported by the build.
    pub listing: Option<Utf8PathBuf>,
}

/// Values supplied on the command line that replace configured ones.
#[derive(Clone, Debug, Default)]
pub struct Overrides<'a> {
    /// Replacement for `excluded_scopes`.
    pub excluded_scopes: Option<&'a str>,
    /// Replacement for `manifest`.
    pub manifest: Option<&'a Utf8Path>,
    /// Replacement for `listing`.
    pub listing: Option<&'a Utf8Path>,
}

impl DepsealConfig {
    /// Load configuration from `explicit`, or from [`DEFAULT_CONFIG_FILE`]
    /// when no path was given.
    ///
    /// # Errors
    ///
    /// Returns [`DepsealError::ConfigRead`] if an explicit file cannot be
    /// read, and [`DepsealError::InvalidConfig`] if the file does not parse.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self> {
        Self::load_with(explicit, |path| std::fs::read_to_string(path))
    }

    /// Load configuration using the supplied reader.
    ///
    /// A missing default file yields [`DepsealConfig::default`]; a missing
    /// explicit file is an error. The reader is injected so tests can supply
    /// file contents without touching the file system.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    ///
    /// # Examples
    ///
    /// ```
    /// use depseal::DepsealConfig;
    ///
    /// let config = DepsealConfig::load_with(None, |_| {
    ///     Ok("excluded_scopes = \"lintClasspath\"\n".to_owned())
    /// })
    /// .unwrap();
    /// assert_eq!(config.excluded_scopes.as_deref(), Some("lintClasspath"));
    /// ```
    pub fn load_with<F>(explicit: Option<&Utf8Path>, read: F) -> Result<Self>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let path = explicit.unwrap_or_else(|| Utf8Path::new(DEFAULT_CONFIG_FILE));
        match read(path) {
            Ok(source) => Self::from_toml(&source, path),
            Err(err) if explicit.is_none() && err.kind() == io::ErrorKind::NotFound => {
                debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(DepsealError::ConfigRead {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Parse configuration text; `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`DepsealError::InvalidConfig`] when `source` is not valid
    /// TOML or names an unknown key.
    pub fn from_toml(source: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(source).map_err(|err| DepsealError::InvalidConfig {
            path: origin.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Apply command-line overrides, keeping configured values where no flag
    /// was given.
    #[must_use]
    pub fn with_overrides(self, overrides: &Overrides<'_>) -> Self {
        Self {
            excluded_scopes: overrides
                .excluded_scopes
                .map(str::to_owned)
                .or(self.excluded_scopes),
            manifest: overrides.manifest.map(Utf8Path::to_owned).or(self.manifest),
            listing: overrides.listing.map(Utf8Path::to_owned).or(self.listing),
        }
    }

    /// Parsed scope exclusions; empty when none are configured.
    #[must_use]
    pub fn exclusions(&self) -> ExclusionSet {
        self.excluded_scopes
            .as_deref()
            .map(ExclusionSet::parse)
            .unwrap_or_default()
    }

    /// The configured listing path.
    ///
    /// # Errors
    ///
    /// Returns [`DepsealError::MissingSetting`] when no listing was
    /// configured.
    pub fn listing_path(&self) -> Result<&Utf8Path> {
        self.listing
            .as_deref()
            .ok_or(DepsealError::MissingSetting {
                name: "listing",
                flag: "--listing",
            })
    }
}
