//! TOML package definition
//!
//! The static, human-maintained part of `.PKGINFO`. Everything computed at
//! build time (`arch`, `builddate`, `size`, `datahash`) is added later by the
//! variant and the assembler.

use std::fs;
use std::path::Path;

use apkpack_schema::{PkgInfo, field};
use serde::Deserialize;

use crate::error::{PackError, Result};

/// Descriptive fields shared by every variant built from one tree.
///
/// ```toml
/// pkgname = "hello"
/// pkgver = "1.0.0-r0"
/// pkgdesc = "Says hello"
/// url = "https://example.org/hello"
/// maintainer = "Jane Doe <jane@example.org>"
/// packager = "Jane Doe <jane@example.org>"
/// commit = "3bb554e284d9e685b3f3fb07ae5c294d5ec7c6dd"
/// license = "MIT"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInfo {
    /// Package name.
    pub pkgname: String,
    /// Version including release suffix, e.g. `1.0.0-r0`.
    pub pkgver: String,
    /// One-line description.
    pub pkgdesc: String,
    /// Upstream project URL.
    pub url: String,
    /// Maintainer contact.
    pub maintainer: String,
    /// Packager contact.
    pub packager: String,
    /// Source package name. Defaults to `pkgname`.
    #[serde(default)]
    pub origin: Option<String>,
    /// Source revision.
    pub commit: String,
    /// SPDX license expression.
    pub license: String,
}

impl PackageInfo {
    /// Load a package definition from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// leaves `pkgname`/`pkgver` empty.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PackError::path(path, e))?;
        Self::parse(&content)
    }

    /// Parse a package definition from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or required fields are empty.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let info: Self = toml::from_str(toml_str)?;
        info.validate()?;
        Ok(info)
    }

    /// Check that the fields making up the file name are present.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::MissingArgument`] naming the empty field.
    pub fn validate(&self) -> Result<()> {
        if self.pkgname.trim().is_empty() {
            return Err(PackError::MissingArgument(field::PKGNAME));
        }
        if self.pkgver.trim().is_empty() {
            return Err(PackError::MissingArgument(field::PKGVER));
        }
        Ok(())
    }

    /// The base `.PKGINFO` record for this package.
    pub fn to_pkginfo(&self) -> PkgInfo {
        let origin = self.origin.as_deref().unwrap_or(&self.pkgname);
        [
            (field::PKGNAME, self.pkgname.as_str()),
            (field::PKGVER, self.pkgver.as_str()),
            (field::PKGDESC, self.pkgdesc.as_str()),
            (field::URL, self.url.as_str()),
            (field::MAINTAINER, self.maintainer.as_str()),
            (field::PACKAGER, self.packager.as_str()),
            (field::ORIGIN, origin),
            (field::COMMIT, self.commit.as_str()),
            (field::LICENSE, self.license.as_str()),
        ]
        .into_iter()
        .collect()
    }
}
