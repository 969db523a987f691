//! apkpack - build signed Alpine packages from a directory tree
//!
//! Produces two packages per run: `<name>-<ver>-<arch>.apk` with everything
//! except documentation, and `<name>-doc-<ver>-noarch.apk` with the man pages
//! and licenses.

use std::path::PathBuf;

use anyhow::{Context, Result};
use apkpack_core::{BuildConfig, BuildTime, PackageInfo, build_time::SOURCE_DATE_EPOCH};
use apkpack_schema::Arch;
use clap::Parser;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "apkpack")]
#[command(author, version, about = "Build signed Alpine packages from a directory tree")]
pub struct Cli {
    /// Target architecture of the main package (e.g. x86_64, aarch64)
    #[arg(long)]
    pub arch: Arch,

    /// PEM-encoded PKCS#8 RSA private key; its file name names the signature
    #[arg(long, env = "APKPACK_SIGNING_KEY")]
    pub key: PathBuf,

    /// Directory to write the packages to
    #[arg(long)]
    pub out: PathBuf,

    /// TOML file with the package's descriptive fields
    #[arg(long)]
    pub info: PathBuf,

    /// Directory for the intermediate data archive; defaults to the system
    /// temporary directory
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Unix timestamp stamped on every entry; defaults to now
    #[arg(long, env = SOURCE_DATE_EPOCH, hide_env_values = true)]
    pub source_date_epoch: Option<String>,

    /// Root of the tree to package
    pub dir: PathBuf,
}

impl Cli {
    /// Resolve the arguments into a build configuration.
    ///
    /// # Errors
    ///
    /// Fails if the package info file cannot be loaded or the timestamp is
    /// invalid.
    pub fn into_config(self) -> Result<BuildConfig> {
        let package = PackageInfo::from_file(&self.info)
            .with_context(|| format!("Failed to load package info {}", self.info.display()))?;
        let build_time = BuildTime::from_source_date_epoch(self.source_date_epoch.as_deref())?;

        Ok(BuildConfig {
            root: self.dir,
            arch: self.arch,
            key: self.key,
            out_dir: self.out,
            scratch_dir: self.scratch_dir,
            build_time,
            package,
        })
    }
}

/// Build both packages.
///
/// # Errors
///
/// Returns the first error of any step, with context.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    tracing::debug!("Build time {}", config.build_time);

    let built = apkpack_core::build_packages(&config).context("Failed to build packages")?;
    for package in &built {
        println!("{}", package.path.display());
    }
    Ok(())
}
