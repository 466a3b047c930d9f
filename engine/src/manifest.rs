//! Trusted manifest parsing and regeneration.
//!
//! A manifest is a list of `group:name:version:fileTag:digest` assertions,
//! case-insensitive. Rendered manifests wrap the list in a fixed envelope so
//! the output can be committed and read back unchanged:
//!
//! ```text
//! dependencyVerification {
//!     verify = [
//!         'acme:widget:1.0:widget-1.0.jar:9f86d0...',
//!     ]
//! }
//! ```

use crate::error::{IntegrityError, Result};
use crate::inventory::Inventory;
use crate::key::{DependencyKey, KEY_DELIMITER};
use std::collections::BTreeMap;

/// Opening delimiter of a rendered manifest document.
pub const DOCUMENT_HEADER: &str = "dependencyVerification {\n    verify = [\n";

/// Closing delimiter of a rendered manifest document.
pub const DOCUMENT_FOOTER: &str = "    ]\n}\n";

const ENTRY_INDENT: &str = "        ";
const ENTRY_SEPARATOR: char = ',';
const LIST_OPEN: char = '[';
const LIST_CLOSE: char = ']';
const QUOTES: [char; 2] = ['\'', '"'];

/// Expected digests keyed by canonical artifact identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    assertions: BTreeMap<DependencyKey, String>,
}

impl Manifest {
    /// Parse an ordered sequence of assertion strings.
    ///
    /// Each assertion is trimmed, lowercased, and split on `:` into exactly
    /// five non-empty tokens. When a key is asserted more than once, the last
    /// assertion wins.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::MalformedManifestEntry`] with the offending
    /// assertion verbatim if any entry is not a five-token tuple.
    ///
    /// # Examples
    ///
    /// ```
    /// use depseal_engine::manifest::Manifest;
    ///
    /// let manifest = Manifest::parse_assertions(["ACME:widget:1.0:jar:ABC123"]).unwrap();
    /// assert_eq!(manifest.len(), 1);
    /// assert!(Manifest::parse_assertions(["acme:widget:1.0:abc123"]).is_err());
    /// ```
    pub fn parse_assertions<I, S>(assertions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = BTreeMap::new();
        for assertion in assertions {
            let (key, digest) = parse_assertion(assertion.as_ref())?;
            parsed.insert(key, digest);
        }
        Ok(Self { assertions: parsed })
    }

    /// Parse a complete manifest document as produced by [`render_document`].
    ///
    /// Every quoted entry between `[` and `]` is an assertion. Blank text is
    /// an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrityError::MalformedManifestEntry`] if the document has
    /// no assertion list, an entry is unquoted, or an entry is not a
    /// five-token tuple.
    pub fn parse_document(text: &str) -> Result<Self> {
        let Some(first_line) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
            return Ok(Self::default());
        };
        let body = text
            .find(LIST_OPEN)
            .zip(text.rfind(LIST_CLOSE))
            .and_then(|(open, close)| text.get(open + LIST_OPEN.len_utf8()..close))
            .ok_or_else(|| IntegrityError::MalformedManifestEntry {
                line: first_line.to_owned(),
            })?;
        let entries = body
            .split(ENTRY_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(unquote)
            .collect::<Result<Vec<_>>>()?;
        Self::parse_assertions(entries)
    }

    /// Look up the expected digest for `key`.
    #[must_use]
    pub fn expected_digest(&self, key: &DependencyKey) -> Option<&str> {
        self.assertions.get(key).map(String::as_str)
    }

    /// Number of pinned artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    /// Return true when the manifest pins nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Iterate over assertions in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&DependencyKey, &str)> {
        self.assertions.iter().map(|(key, digest)| (key, digest.as_str()))
    }
}

impl From<&Inventory> for Manifest {
    /// Treat every inventoried digest as an expectation.
    fn from(inventory: &Inventory) -> Self {
        Self {
            assertions: inventory
                .iter()
                .map(|(key, digest)| (key.clone(), digest.as_str().to_owned()))
                .collect(),
        }
    }
}

fn parse_assertion(raw: &str) -> Result<(DependencyKey, String)> {
    let malformed = || IntegrityError::MalformedManifestEntry {
        line: raw.to_owned(),
    };
    let lowered = raw.trim().to_lowercase();
    let tokens: Vec<&str> = lowered.split(KEY_DELIMITER).collect();
    let &[group, name, version, file_tag, digest] = tokens.as_slice() else {
        return Err(malformed());
    };
    if digest.is_empty() {
        return Err(malformed());
    }
    let key = DependencyKey::new(group, name, version, file_tag).map_err(|_| malformed())?;
    Ok((key, digest.to_owned()))
}

fn unquote(entry: &str) -> Result<&str> {
    QUOTES
        .iter()
        .find_map(|quote| entry.strip_prefix(*quote)?.strip_suffix(*quote))
        .ok_or_else(|| IntegrityError::MalformedManifestEntry {
            line: entry.to_owned(),
        })
}

/// Render `inventory` as a complete manifest document.
///
/// One `'group:name:version:fileTag:digest',` line per entry in canonical
/// key order, wrapped in [`DOCUMENT_HEADER`] and [`DOCUMENT_FOOTER`].
/// Identical inventories always render byte-identical documents.
#[must_use]
pub fn render_document(inventory: &Inventory) -> String {
    let entries: String = inventory
        .iter()
        .map(|(key, digest)| format!("{ENTRY_INDENT}'{key}{KEY_DELIMITER}{digest}'{ENTRY_SEPARATOR}\n"))
        .collect();
    format!("{DOCUMENT_HEADER}{entries}{DOCUMENT_FOOTER}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Digest;
    use rstest::rstest;

    fn digest(fill: char) -> Sha256Digest {
        Sha256Digest::try_from(fill.to_string().repeat(64).as_str()).expect("valid digest")
    }

    fn key(group: &str, name: &str, version: &str, file_tag: &str) -> DependencyKey {
        DependencyKey::new(group, name, version, file_tag).expect("valid key")
    }

    fn sample_inventory() -> Inventory {
        [
            (key("acme", "widget", "1.0", "widget-1.0.jar"), digest('a')),
            (key("acme", "bolt", "2.0", "bolt-2.0.jar"), digest('b')),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn parses_and_lowercases_assertions() {
        let manifest = Manifest::parse_assertions(["ACME:Widget:1.0:JAR:ABCDEF"]).expect("valid");
        assert_eq!(
            manifest.expected_digest(&key("acme", "widget", "1.0", "jar")),
            Some("abcdef")
        );
    }

    #[rstest]
    #[case::four_tokens("acme:widget:1.0:abcdef")]
    #[case::six_tokens("acme:widget:1.0:jar:extra:abcdef")]
    #[case::empty_digest("acme:widget:1.0:jar:")]
    #[case::empty_field("acme::1.0:jar:abcdef")]
    #[case::blank("")]
    fn malformed_assertions_name_the_line(#[case] line: &str) {
        let err = Manifest::parse_assertions(["acme:bolt:2.0:jar:abcdef", line])
            .expect_err("malformed entry");
        assert!(matches!(
            err,
            IntegrityError::MalformedManifestEntry { line: reported } if reported == line
        ));
    }

    #[test]
    fn later_assertions_replace_earlier_ones() {
        let manifest =
            Manifest::parse_assertions(["acme:widget:1.0:jar:aaaa", "acme:widget:1.0:jar:bbbb"])
                .expect("valid");
        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.expected_digest(&key("acme", "widget", "1.0", "jar")),
            Some("bbbb")
        );
    }

    #[test]
    fn renders_sorted_entries_inside_the_envelope() {
        let document = render_document(&sample_inventory());

        let expected = format!(
            "dependencyVerification {{\n    verify = [\n        'acme:bolt:2.0:bolt-2.0.jar:{}',\n        'acme:widget:1.0:widget-1.0.jar:{}',\n    ]\n}}\n",
            digest('b'),
            digest('a'),
        );
        assert_eq!(document, expected);
    }

    #[test]
    fn renders_empty_inventory_as_bare_envelope() {
        let document = render_document(&Inventory::new());
        assert_eq!(document, format!("{DOCUMENT_HEADER}{DOCUMENT_FOOTER}"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_document(&sample_inventory()), render_document(&sample_inventory()));
    }

    #[test]
    fn rendered_document_parses_back_to_the_inventory_digests() {
        let inventory = sample_inventory();
        let parsed = Manifest::parse_document(&render_document(&inventory)).expect("round trip");
        assert_eq!(parsed, Manifest::from(&inventory));
    }

    #[rstest]
    #[case::inner_space("acme", "widget", "1.0", "widget 1.0.jar")]
    #[case::brackets("acme", "widget", "1.0", "widget[1.0].jar")]
    #[case::punctuation("org.acme_x", "widget-api", "1.0+build.7", "widget-api-1.0+build.7-sources.jar")]
    fn unusual_but_valid_keys_round_trip(
        #[case] group: &str,
        #[case] name: &str,
        #[case] version: &str,
        #[case] file_tag: &str,
    ) {
        let inventory: Inventory = [(key(group, name, version, file_tag), digest('c'))]
            .into_iter()
            .collect();

        let parsed = Manifest::parse_document(&render_document(&inventory)).expect("round trip");

        assert_eq!(parsed, Manifest::from(&inventory));
    }

    #[rstest]
    #[case::comma("'acme:widget:1.0:widget-1.0,patched.jar:aaaa'")]
    #[case::padded_field("'acme : widget:1.0:jar:aaaa'")]
    fn document_entries_cannot_smuggle_manifest_syntax(#[case] entry: &str) {
        let text = format!("{DOCUMENT_HEADER}        {entry},\n{DOCUMENT_FOOTER}");
        let err = Manifest::parse_document(&text).expect_err("reserved syntax in entry");
        assert!(matches!(err, IntegrityError::MalformedManifestEntry { .. }));
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  \n\t\n")]
    fn blank_documents_are_empty_manifests(#[case] text: &str) {
        assert!(Manifest::parse_document(text).expect("blank").is_empty());
    }

    #[test]
    fn document_accepts_double_quotes_and_missing_trailing_comma() {
        let text = "dependencyVerification {\n  verify = [\n    \"acme:widget:1.0:jar:aaaa\"\n  ]\n}\n";
        let manifest = Manifest::parse_document(text).expect("valid document");
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn document_without_list_is_malformed() {
        let err = Manifest::parse_document("verify acme:widget:1.0:jar:aaaa").expect_err("no list");
        assert!(matches!(err, IntegrityError::MalformedManifestEntry { .. }));
    }

    #[test]
    fn unquoted_document_entry_is_malformed() {
        let text = "dependencyVerification {\n    verify = [\n        acme:widget:1.0:jar:aaaa,\n    ]\n}\n";
        let err = Manifest::parse_document(text).expect_err("unquoted");
        assert!(matches!(
            err,
            IntegrityError::MalformedManifestEntry { line } if line == "acme:widget:1.0:jar:aaaa"
        ));
    }

    #[test]
    fn stale_four_token_schema_is_rejected_in_documents() {
        let text = "dependencyVerification {\n    verify = [\n        'acme:widget:aaaa',\n    ]\n}\n";
        assert!(Manifest::parse_document(text).is_err());
    }
}
