//! Single-entry, gzip-compressed tar segments.
//!
//! An `.apk` is several gzip members glued together. The tar stream inside
//! must read as one archive, so every segment except the last has its
//! end-of-archive marker cut off before compression.

use std::io::{self, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};

use crate::build_time::BuildTime;
use crate::error::{PackError, Result};

/// Size of the tar end-of-archive marker: two zeroed 512-byte blocks.
pub const END_OF_ARCHIVE_LEN: usize = 1024;

/// Owner recorded on every entry.
const OWNER_NAME: &str = "root";

/// PAX keys for the timestamps ustar has no field for.
const PAX_ATIME: &str = "atime";
const PAX_CTIME: &str = "ctime";
/// PAX keys for names that do not fit the ustar header.
const PAX_PATH: &str = "path";
const PAX_LINKPATH: &str = "linkpath";

/// A PAX extended header record.
pub(crate) type PaxRecord<'a> = (&'a str, Vec<u8>);

/// Stamp the build time as mtime and normalize ownership to root.
///
/// # Errors
///
/// Fails if the owner names do not fit the header.
pub(crate) fn normalize_header(header: &mut Header, build_time: BuildTime) -> io::Result<()> {
    header.set_mtime(build_time.unix_secs());
    header.set_uid(0);
    header.set_gid(0);
    header.set_username(OWNER_NAME)?;
    header.set_groupname(OWNER_NAME)?;
    Ok(())
}

/// Append one entry, preceded by a PAX extended header carrying `atime`,
/// `ctime` and the caller's `records`.
///
/// A `path` or `link` too long for the ustar header is written as a PAX
/// `path`/`linkpath` record, with a truncated copy left in the header.
///
/// # Errors
///
/// Returns any error from the underlying writer, or from a name that is
/// invalid rather than merely long.
pub(crate) fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    header: &mut Header,
    path: &Path,
    link: Option<&Path>,
    mut records: Vec<PaxRecord<'_>>,
    build_time: BuildTime,
    data: impl Read,
) -> io::Result<()> {
    let stamp = build_time.unix_secs().to_string();
    records.push((PAX_ATIME, stamp.clone().into_bytes()));
    records.push((PAX_CTIME, stamp.into_bytes()));

    if let Err(e) = header.set_path(path) {
        let bytes = path.as_os_str().as_encoded_bytes();
        if bytes.len() <= header.as_old().name.len() {
            return Err(e);
        }
        if let Some(ustar) = header.as_ustar_mut() {
            ustar.prefix.fill(0);
        }
        store_truncated(&mut header.as_old_mut().name, bytes);
        records.push((PAX_PATH, bytes.to_vec()));
    }
    if let Some(target) = link {
        let linked = header.set_link_name(target);
        if let Err(e) = linked {
            let bytes = target.as_os_str().as_encoded_bytes();
            if bytes.len() <= header.as_old().linkname.len() {
                return Err(e);
            }
            store_truncated(&mut header.as_old_mut().linkname, bytes);
            records.push((PAX_LINKPATH, bytes.to_vec()));
        }
    }

    records.sort_by_key(|(key, _)| *key);
    builder.append_pax_extensions(records.iter().map(|(key, value)| (*key, value.as_slice())))?;
    header.set_cksum();
    builder.append(header, data)
}

fn store_truncated(field: &mut [u8], bytes: &[u8]) {
    let len = field.len().min(bytes.len());
    field.fill(0);
    field[..len].copy_from_slice(&bytes[..len]);
}

/// Build a gzip-compressed tar segment holding one regular file `name` with
/// body `contents`, without the trailing end-of-archive marker.
///
/// # Errors
///
/// Returns [`PackError::Archive`] if the tar or gzip writer fails.
pub fn build_segment(name: &str, contents: &[u8], build_time: BuildTime) -> Result<Vec<u8>> {
    let archive_err = |e| PackError::archive(name, e);

    let mut header = Header::new_ustar();
    normalize_header(&mut header, build_time).map_err(archive_err)?;
    header.set_entry_type(EntryType::Regular);
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);

    let mut builder = tar::Builder::new(Vec::new());
    append_entry(
        &mut builder,
        &mut header,
        Path::new(name),
        None,
        Vec::new(),
        build_time,
        contents,
    )
    .map_err(archive_err)?;
    let mut tarball = builder.into_inner().map_err(archive_err)?;
    tarball.truncate(tarball.len() - END_OF_ARCHIVE_LEN);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tarball).map_err(archive_err)?;
    encoder.finish().map_err(archive_err)
}
