//! Canonical artifact identities.
//!
//! A [`DependencyKey`] names one verifiable file as
//! `group:name:version:fileTag`. The canonical string is the single source of
//! truth for equality, ordering, and hashing, and every field is case-folded
//! to lowercase on construction.
//!
//! [`derive_key`] maps an artifact's location in the dependency cache to its
//! key. The cache lays files out as `.../group/name/version/contentHash/fileName`;
//! the content hash is the cache's own addressing detail and is not part of
//! the identity.

use crate::error::{IntegrityError, Result};
use camino::Utf8Path;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Separator between the fields of a canonical key and of a manifest entry.
pub const KEY_DELIMITER: char = ':';

/// Number of trailing path segments that make up the cache layout.
pub const CACHE_LAYOUT_SEGMENTS: usize = 5;

/// Characters that delimit or quote manifest entries and so cannot appear in
/// a key field.
pub const RESERVED_CHARACTERS: [char; 4] = [KEY_DELIMITER, ',', '\'', '"'];

/// Reasons a key field is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFieldError {
    /// The field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the rejected field.
        field: &'static str,
    },

    /// The field contains a character the manifest uses as syntax, so it
    /// could not round-trip through a manifest entry.
    #[error("{field} \"{value}\" must not contain '{character}'")]
    ReservedCharacter {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// The offending character.
        character: char,
    },

    /// The field starts or ends with whitespace, which manifest parsing
    /// trims away.
    #[error("{field} \"{value}\" must not start or end with whitespace")]
    SurroundingWhitespace {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Identity of one verifiable artifact.
///
/// # Examples
///
/// ```
/// use depseal_engine::key::DependencyKey;
///
/// let key = DependencyKey::new("Acme", "Widget", "1.0", "widget-1.0.jar").unwrap();
/// assert_eq!(key.as_str(), "acme:widget:1.0:widget-1.0.jar");
/// ```
#[derive(Debug, Clone)]
pub struct DependencyKey {
    canonical: String,
    /// Byte offsets of the three delimiters within `canonical`.
    delimiters: [usize; 3],
}

impl DependencyKey {
    /// Build a key from its four fields, lowercasing each.
    ///
    /// # Errors
    ///
    /// Returns [`KeyFieldError`] if any field is empty, contains one of
    /// [`RESERVED_CHARACTERS`], or starts or ends with whitespace.
    pub fn new(
        group: &str,
        name: &str,
        version: &str,
        file_tag: &str,
    ) -> std::result::Result<Self, KeyFieldError> {
        let group = normalise_field("group", group)?;
        let name = normalise_field("name", name)?;
        let version = normalise_field("version", version)?;
        let file_tag = normalise_field("fileTag", file_tag)?;
        let first = group.len();
        let second = first + 1 + name.len();
        let third = second + 1 + version.len();
        let canonical = format!(
            "{group}{KEY_DELIMITER}{name}{KEY_DELIMITER}{version}{KEY_DELIMITER}{file_tag}"
        );
        Ok(Self {
            canonical,
            delimiters: [first, second, third],
        })
    }

    /// The artifact group, for example an organisation namespace.
    #[must_use]
    pub fn group(&self) -> &str {
        let [first, _, _] = self.delimiters;
        &self.canonical[..first]
    }

    /// The artifact name within its group.
    #[must_use]
    pub fn name(&self) -> &str {
        let [first, second, _] = self.delimiters;
        &self.canonical[first + 1..second]
    }

    /// The resolved version.
    #[must_use]
    pub fn version(&self) -> &str {
        let [_, second, third] = self.delimiters;
        &self.canonical[second + 1..third]
    }

    /// The discriminator between files published under one version.
    #[must_use]
    pub fn file_tag(&self) -> &str {
        let [_, _, third] = self.delimiters;
        &self.canonical[third + 1..]
    }

    /// The canonical `group:name:version:fileTag` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

fn normalise_field(field: &'static str, value: &str) -> std::result::Result<String, KeyFieldError> {
    if value.is_empty() {
        return Err(KeyFieldError::Empty { field });
    }
    if let Some(character) = value.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(KeyFieldError::ReservedCharacter {
            field,
            value: value.to_owned(),
            character,
        });
    }
    if value.trim() != value {
        return Err(KeyFieldError::SurroundingWhitespace {
            field,
            value: value.to_owned(),
        });
    }
    Ok(value.to_lowercase())
}

/// Total order over canonical strings.
///
/// Keys sort lexicographically on `group:name:version:fileTag`, which is the
/// order used for inventory iteration, manifest output, and verification logs.
#[must_use]
pub fn compare_keys(left: &DependencyKey, right: &DependencyKey) -> Ordering {
    left.canonical.cmp(&right.canonical)
}

impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for DependencyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DependencyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(self, other)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Derive the canonical key of a cached artifact from its path.
///
/// Only the last [`CACHE_LAYOUT_SEGMENTS`] segments are consulted, so extra
/// leading directories never change the result. Empty segments produced by
/// leading or doubled separators are ignored.
///
/// # Errors
///
/// Returns [`IntegrityError::MalformedCachePath`] if fewer than five segments
/// remain, or if a segment cannot form a key field.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use depseal_engine::key::derive_key;
///
/// let path = Utf8Path::new("/cache/files/acme/widget/1.0/3f2a/widget-1.0.jar");
/// let key = derive_key(path).unwrap();
/// assert_eq!(key.as_str(), "acme:widget:1.0:widget-1.0.jar");
/// ```
pub fn derive_key(path: &Utf8Path) -> Result<DependencyKey> {
    let malformed = |reason: String| IntegrityError::MalformedCachePath {
        path: path.to_owned(),
        reason,
    };
    let segments: Vec<&str> = path
        .as_str()
        .split(std::path::is_separator)
        .filter(|segment| !segment.is_empty())
        .collect();
    let start = segments.len().saturating_sub(CACHE_LAYOUT_SEGMENTS);
    match segments.get(start..) {
        Some(&[group, name, version, _content_hash, file_name]) => {
            DependencyKey::new(group, name, version, file_name)
                .map_err(|err| malformed(err.to_string()))
        }
        _ => Err(malformed(format!(
            "expected at least {CACHE_LAYOUT_SEGMENTS} segments \
             (group/name/version/contentHash/fileName), found {}",
            segments.len()
        ))),
    }
}
