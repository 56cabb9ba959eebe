//! Dependency declarations and manifest parsing
//!
//! A manifest is a TOML file listing the dependencies a workspace needs,
//! each pinned to an exact revision:
//!
//! ```toml
//! [[dependency]]
//! name = "interfaces"
//! url = "https://example.com/interfaces.git"
//! revision = "48c1b84f2245324e90871924e4f606f846197818"
//! ```
//!
//! Declarations are validated into a [`DependencySet`] before anything
//! touches the filesystem.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One declared dependency: a name, where to fetch it from, and the exact
/// revision it is pinned to.
///
/// `name` doubles as the directory name under the workspace root. The
/// pinned revision is an immutable content identifier (a full or
/// abbreviated hex commit id), never a branch or tag name, so a satisfied
/// checkout can be recognized without asking the remote anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Unique identifier, also the local directory name
    pub name: String,
    /// Remote location to clone and fetch from
    pub url: String,
    /// Exact revision to pin the checkout to
    pub revision: String,
}

impl DependencyRecord {
    /// Create a new record.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            revision: revision.into(),
        }
    }
}

/// An ordered, validated, duplicate-free sequence of [`DependencyRecord`]s.
///
/// Validation happens once, on construction, so a run either fails before
/// any filesystem action or processes a set known to be well-formed.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    records: Vec<DependencyRecord>,
}

impl DependencySet {
    /// Validate records into a set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if two records share a name, a name is
    /// not usable as a single path segment, or a pinned revision is empty
    /// or malformed.
    pub fn new(records: Vec<DependencyRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !is_valid_name(&record.name) {
                return Err(Error::InvalidName {
                    name: record.name.clone(),
                });
            }
            if !is_valid_revision(&record.revision) {
                return Err(Error::InvalidRevision {
                    name: record.name.clone(),
                    revision: record.revision.clone(),
                });
            }
            if !seen.insert(record.name.as_str()) {
                return Err(Error::DuplicateName {
                    name: record.name.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    /// The records in declaration order.
    pub fn records(&self) -> &[DependencyRecord] {
        &self.records
    }

    /// Iterate over the records in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, DependencyRecord> {
        self.records.iter()
    }

    /// Number of declared dependencies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set declares nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a DependencyRecord;
    type IntoIter = std::slice::Iter<'a, DependencyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Dependency manifest parsed from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared dependencies, in file order
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyRecord>,
}

impl Manifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }

    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestRead`] if the file cannot be read and a
    /// parse error if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Validate the declarations into a [`DependencySet`].
    pub fn into_set(self) -> Result<DependencySet> {
        DependencySet::new(self.dependencies)
    }
}

/// A name must be a single, safe path segment.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// A pinned revision is a hex commit identifier, full or abbreviated.
///
/// Four characters is the shortest unambiguous abbreviation git accepts;
/// forty is a full SHA-1 id.
fn is_valid_revision(revision: &str) -> bool {
    (4..=40).contains(&revision.len()) && revision.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(
            r#"
[[dependency]]
name = "interfaces"
url = "https://example.com/interfaces.git"
revision = "48c1b84f2245324e90871924e4f606f846197818"

[[dependency]]
name = "audio"
url = "https://example.com/audio.git"
revision = "bca2b9f3"
"#,
        )
        .unwrap();

        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(manifest.dependencies[0].name, "interfaces");
        assert_eq!(manifest.dependencies[1].revision, "bca2b9f3");
    }

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.into_set().unwrap().is_empty());
    }

    #[test]
    fn test_set_preserves_declaration_order() {
        let records = vec![
            DependencyRecord::new("b", "url-b", "bbb222"),
            DependencyRecord::new("a", "url-a", "aaa111"),
        ];
        let set = DependencySet::new(records).unwrap();
        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let records = vec![
            DependencyRecord::new("interfaces", "url-1", "aaa111"),
            DependencyRecord::new("interfaces", "url-2", "bbb222"),
        ];
        let err = DependencySet::new(records).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { name } if name == "interfaces"));
    }

    #[test]
    fn test_empty_revision_rejected() {
        let records = vec![DependencyRecord::new("interfaces", "url", "")];
        let err = DependencySet::new(records).unwrap_err();
        assert!(matches!(err, Error::InvalidRevision { .. }));
    }

    #[test]
    fn test_non_hex_revision_rejected() {
        let records = vec![DependencyRecord::new("interfaces", "url", "main")];
        let err = DependencySet::new(records).unwrap_err();
        assert!(matches!(err, Error::InvalidRevision { .. }));
    }

    #[test]
    fn test_name_with_separator_rejected() {
        let records = vec![DependencyRecord::new("../escape", "url", "aaa111")];
        let err = DependencySet::new(records).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }
}
