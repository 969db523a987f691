//! Inputs for one `apkpack` run.

use std::path::PathBuf;

use apkpack_schema::Arch;

use crate::build_time::BuildTime;
use crate::error::{PackError, Result};
use crate::package::PackageInfo;

/// Everything needed to build the main and `-doc` packages from one tree.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Root of the tree to package; becomes `/` on the target.
    pub root: PathBuf,
    /// Architecture of the main package.
    pub arch: Arch,
    /// PEM-encoded PKCS#8 RSA private key.
    pub key: PathBuf,
    /// Directory the `.apk` files are written to. Must exist.
    pub out_dir: PathBuf,
    /// Where the intermediate data archive is written. The system temporary
    /// directory when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Timestamp stamped on every entry and written as `builddate`.
    pub build_time: BuildTime,
    /// Static package fields.
    pub package: PackageInfo,
}

impl BuildConfig {
    /// The directory intermediate archives are written to.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Reject empty inputs. Touches no files.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::MissingArgument`] for the first empty input.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(PackError::MissingArgument("dir"));
        }
        if self.key.as_os_str().is_empty() {
            return Err(PackError::MissingArgument("key"));
        }
        if self.out_dir.as_os_str().is_empty() {
            return Err(PackError::MissingArgument("out"));
        }
        self.package.validate()
    }
}
