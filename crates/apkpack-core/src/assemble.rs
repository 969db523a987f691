//! Package assembly.
//!
//! An `.apk` is three gzip members back to back:
//!
//! ```text
//! +-------------------------+----------------------+---------------------------+
//! | .SIGN.RSA.<key>.pub     | .PKGINFO             | data archive              |
//! | (no end-of-archive)     | (no end-of-archive)  | (with end-of-archive)     |
//! +-------------------------+----------------------+---------------------------+
//! ```
//!
//! The steps run in a fixed order because each one consumes the previous
//! result: the data archive's size and SHA-256 go into `.PKGINFO`, the
//! compressed `.PKGINFO` segment is what gets signed.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use apkpack_schema::{APK_EXTENSION, PKGINFO_ENTRY, PkgInfo, field};

use crate::build_time::BuildTime;
use crate::checksum::{DigestAlgorithm, digest_file};
use crate::config::BuildConfig;
use crate::data::build_data_archive;
use crate::error::{PackError, Result};
use crate::segment::build_segment;
use crate::signer::SigningKey;
use crate::variant::Variant;

/// A package written to disk.
#[derive(Debug, Clone)]
pub struct BuiltPackage {
    /// Where the `.apk` was written.
    pub path: PathBuf,
    /// The `.PKGINFO` record embedded in it.
    pub info: PkgInfo,
}

/// `<pkgname>-<pkgver>-<arch>.apk`
pub fn package_file_name(info: &PkgInfo) -> String {
    format!(
        "{}-{}-{}.{APK_EXTENSION}",
        info.get(field::PKGNAME).unwrap_or_default(),
        info.get(field::PKGVER).unwrap_or_default(),
        info.get(field::ARCH).unwrap_or_default(),
    )
}

/// Build one signed package from the files under `root` accepted by
/// `include`, and write it into `out_dir`. The intermediate data archive
/// lives in `scratch_dir` and is removed whether or not assembly succeeds.
///
/// The package is written to a temporary file in `out_dir` and renamed into
/// place once complete, so a failure never leaves a truncated `.apk`.
///
/// # Errors
///
/// Propagates any archive, filesystem or signing error.
pub fn assemble(
    mut info: PkgInfo,
    root: &Path,
    include: impl Fn(&Path) -> bool,
    out_dir: &Path,
    scratch_dir: &Path,
    key: &SigningKey,
    build_time: BuildTime,
) -> Result<BuiltPackage> {
    let data = build_data_archive(root, include, build_time, scratch_dir)?;
    let datahash = digest_file(data.path(), DigestAlgorithm::Sha256)
        .map_err(|e| PackError::path(data.path(), e))?;
    info.insert(field::SIZE, data.size().to_string());
    info.insert(field::DATAHASH, datahash.as_str());

    let control = build_segment(PKGINFO_ENTRY, info.marshal().as_bytes(), build_time)?;
    let signature = key.sign(&control)?;
    let signature_segment = build_segment(&key.signature_entry_name(), &signature, build_time)?;

    let dest = out_dir.join(package_file_name(&info));
    let mut out = tempfile::Builder::new()
        .prefix(".apkpack-")
        .suffix(".tmp")
        .tempfile_in(out_dir)
        .map_err(|e| PackError::path(out_dir, e))?;
    let write_err = |e| PackError::path(&dest, e);
    let payload = File::open(data.path()).map_err(|e| PackError::path(data.path(), e))?;
    write_members(
        BufWriter::new(out.as_file_mut()),
        &dest,
        &[signature_segment.as_slice(), control.as_slice()],
        payload,
    )?;
    out.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        out.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    out.persist(&dest)
        .map_err(|e| PackError::path(&dest, e.error))?;

    tracing::info!(
        "Built {} ({} bytes installed, datahash {datahash})",
        dest.display(),
        data.size()
    );
    Ok(BuiltPackage { path: dest, info })
}

/// Write the in-memory segments followed by the data archive. Failures are
/// reported against `dest`, the package being produced.
fn write_members(
    mut writer: impl Write,
    dest: &Path,
    segments: &[&[u8]],
    mut payload: impl Read,
) -> Result<()> {
    let write_err = |e| PackError::path(dest, e);
    for segment in segments {
        writer.write_all(segment).map_err(write_err)?;
    }
    std::io::copy(&mut payload, &mut writer).map_err(write_err)?;
    writer.flush().map_err(write_err)
}

/// Build the main and `-doc` packages described by `config`, in that order.
///
/// # Errors
///
/// Argument errors are reported before anything is read. After that the
/// first failing variant aborts the run.
pub fn build_packages(config: &BuildConfig) -> Result<Vec<BuiltPackage>> {
    config.validate()?;
    let key = SigningKey::from_file(&config.key)?;
    let scratch_dir = config.scratch_dir();
    tracing::debug!(
        "Signing with {} (public key expected at {})",
        key.name(),
        key.public_key_path().display()
    );

    let variants = [
        Variant::base(&config.package, config.arch, config.build_time),
        Variant::doc(&config.package, config.build_time),
    ];

    let mut built = Vec::with_capacity(variants.len());
    for variant in variants {
        tracing::info!("Assembling {}", variant.name());
        built.push(assemble(
            variant.info,
            &config.root,
            variant.include,
            &config.out_dir,
            &scratch_dir,
            &key,
            config.build_time,
        )?);
    }
    Ok(built)
}
