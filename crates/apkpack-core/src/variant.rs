//! Package variants split from one tree.
//!
//! Every build produces a main package and a `-doc` package. A single path
//! predicate decides which of the two each file goes to, so no file is ever
//! in both.

use std::path::Path;

use apkpack_schema::{Arch, PkgInfo, field};

use crate::build_time::BuildTime;
use crate::package::PackageInfo;

/// Install-path fragments that mark documentation.
const DOC_PATH_MARKERS: [&str; 2] = ["/man/", "/licenses/"];

/// Whether an install path belongs in the documentation package.
pub fn is_doc_path(path: &Path) -> bool {
    let path = path.to_string_lossy();
    DOC_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

fn is_not_doc_path(path: &Path) -> bool {
    !is_doc_path(path)
}

/// One package to produce: its metadata and the files it takes.
#[derive(Debug, Clone)]
pub struct Variant {
    /// `.PKGINFO` fields known before the data archive is built.
    pub info: PkgInfo,
    /// Selects files by install path.
    pub include: fn(&Path) -> bool,
}

impl Variant {
    /// The main package: everything except documentation, for `arch`.
    pub fn base(package: &PackageInfo, arch: Arch, build_time: BuildTime) -> Self {
        let mut info = package.to_pkginfo();
        info.insert(field::ARCH, arch.as_str());
        info.insert(field::BUILDDATE, build_time.unix_millis().to_string());
        Self {
            info,
            include: is_not_doc_path,
        }
    }

    /// The `-doc` package: only documentation, architecture independent,
    /// installed automatically next to the main package when `docs` is.
    pub fn doc(package: &PackageInfo, build_time: BuildTime) -> Self {
        let mut info = package.to_pkginfo();
        info.insert(field::ARCH, Arch::Noarch.as_str());
        info.insert(field::BUILDDATE, build_time.unix_millis().to_string());
        info.insert(
            field::PKGDESC,
            format!("{} (documentation)", package.pkgdesc),
        );
        info.insert(
            field::INSTALL_IF,
            format!("docs {}={}", package.pkgname, package.pkgver),
        );
        info.insert(field::PKGNAME, format!("{}-doc", package.pkgname));
        Self {
            info,
            include: is_doc_path,
        }
    }

    /// The package name this variant will be written under.
    pub fn name(&self) -> &str {
        self.info.get(field::PKGNAME).unwrap_or_default()
    }
}
