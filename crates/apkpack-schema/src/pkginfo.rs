//! The `.PKGINFO` control record.
//!
//! A package's control metadata is a flat set of `key = value` lines. apk
//! does not care about line order, but the serialized bytes are digested and
//! signed, so they must be reproducible: [`PkgInfo`] always emits its fields
//! sorted by key, whatever order they were inserted in.

use std::collections::BTreeMap;

/// Well-known `.PKGINFO` field names.
pub mod field {
    /// Package name.
    pub const PKGNAME: &str = "pkgname";
    /// Package version, including the `-rN` release suffix.
    pub const PKGVER: &str = "pkgver";
    /// One-line description.
    pub const PKGDESC: &str = "pkgdesc";
    /// Upstream project URL.
    pub const URL: &str = "url";
    /// Maintainer contact.
    pub const MAINTAINER: &str = "maintainer";
    /// Whoever produced this build.
    pub const PACKAGER: &str = "packager";
    /// Name of the source package this was split from.
    pub const ORIGIN: &str = "origin";
    /// Source revision the package was built from.
    pub const COMMIT: &str = "commit";
    /// SPDX license expression.
    pub const LICENSE: &str = "license";
    /// Target architecture.
    pub const ARCH: &str = "arch";
    /// Build timestamp.
    pub const BUILDDATE: &str = "builddate";
    /// Sum of the uncompressed sizes of all files in the package.
    pub const SIZE: &str = "size";
    /// SHA-256 of the compressed data archive.
    pub const DATAHASH: &str = "datahash";
    /// Auto-install condition.
    pub const INSTALL_IF: &str = "install_if";
}

/// An ordered `.PKGINFO` record.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PkgInfo {
    fields: BTreeMap<String, String>,
}

impl PkgInfo {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to the canonical `.PKGINFO` text: one `key = value` line per
    /// field, sorted by key, each terminated by `\n`.
    pub fn marshal(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for PkgInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in &self.fields {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PkgInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = Self::new();
        info.extend(iter);
        info
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for PkgInfo {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
