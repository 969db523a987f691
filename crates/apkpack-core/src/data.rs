//! The data archive: the package payload as one gzip-compressed tarball.
//!
//! The tree is walked in file-name order. Directories are only written when
//! a file below them is included, immediately before that file, so the
//! documentation package does not pick up unrelated empty directories and
//! every directory entry precedes its contents.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File, Metadata};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use apkpack_schema::CHECKSUM_PAX_KEY;
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header, HeaderMode};
use tempfile::TempPath;
use walkdir::WalkDir;

use crate::build_time::BuildTime;
use crate::checksum::{DigestAlgorithm, digest_bytes, digest_file};
use crate::error::{PackError, Result};
use crate::segment::{append_entry, normalize_header};

/// Name used for the data archive in error messages.
const DATA_ARCHIVE: &str = "data archive";

/// Prefix of the temporary file holding the data archive.
const TEMP_PREFIX: &str = "apk-data";

/// A finished data archive on disk.
///
/// The backing temporary file is deleted when this value is dropped.
#[derive(Debug)]
pub struct DataArchive {
    path: TempPath,
    size: u64,
}

impl DataArchive {
    /// Location of the compressed archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sum of the uncompressed sizes of every included regular file.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// The path a file will have once installed: relative to the package root,
/// with a leading `/`.
pub fn install_path(root: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(root).unwrap_or(path);
    Path::new("/").join(relative)
}

/// Build the data archive for every file under `root` whose install path
/// satisfies `include`. The archive is written to a temporary file in
/// `scratch_dir`.
///
/// # Errors
///
/// Fails if the tree cannot be walked or read, or the archive cannot be
/// written. The temporary file is removed on failure.
pub fn build_data_archive(
    root: &Path,
    include: impl Fn(&Path) -> bool,
    build_time: BuildTime,
    scratch_dir: &Path,
) -> Result<DataArchive> {
    if !root.is_dir() {
        return Err(PackError::NotADirectory(root.to_path_buf()));
    }

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(scratch_dir)
        .map_err(|e| PackError::path(scratch_dir, e))?;
    let size = {
        let buffered = BufWriter::new(temp.as_file_mut());
        let encoder = GzEncoder::new(buffered, Compression::default());
        let mut writer = DataWriter::new(root, build_time, tar::Builder::new(encoder));
        writer.walk(&include)?;
        writer.finish()?
    };

    tracing::debug!(
        "Wrote data archive {} ({size} bytes of file content)",
        temp.path().display()
    );

    Ok(DataArchive {
        path: temp.into_temp_path(),
        size,
    })
}

/// Tarball writer feeding the compressed temporary file.
type DataEncoder<'a> = GzEncoder<BufWriter<&'a mut File>>;

/// Walk state for one data archive.
struct DataWriter<'a> {
    root: &'a Path,
    build_time: BuildTime,
    builder: tar::Builder<DataEncoder<'a>>,
    /// Metadata of every directory seen so far, for lazily written entries.
    dir_meta: HashMap<PathBuf, Metadata>,
    /// Directories already written to the archive.
    written_dirs: HashSet<PathBuf>,
    size: u64,
}

impl<'a> DataWriter<'a> {
    fn new(root: &'a Path, build_time: BuildTime, builder: tar::Builder<DataEncoder<'a>>) -> Self {
        Self {
            root,
            build_time,
            builder,
            dir_meta: HashMap::new(),
            written_dirs: HashSet::new(),
            size: 0,
        }
    }

    fn walk(&mut self, include: &impl Fn(&Path) -> bool) -> Result<()> {
        let walker = WalkDir::new(self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let meta = entry.metadata()?;
            let file_type = meta.file_type();

            if file_type.is_dir() {
                self.dir_meta.insert(entry.path().to_path_buf(), meta);
                continue;
            }
            if !file_type.is_file() && !file_type.is_symlink() {
                tracing::warn!("Skipping special file {}", entry.path().display());
                continue;
            }
            if !include(&install_path(self.root, entry.path())) {
                continue;
            }

            self.write_parents(entry.path())?;
            if file_type.is_symlink() {
                self.write_symlink(entry.path(), &meta)?;
            } else {
                self.write_file(entry.path(), &meta)?;
            }
        }
        Ok(())
    }

    /// Write entries for the ancestors of `path` that are not in the archive
    /// yet, outermost first. The root itself is never written.
    fn write_parents(&mut self, path: &Path) -> Result<()> {
        let mut missing = Vec::new();
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == self.root || self.written_dirs.contains(current) {
                break;
            }
            missing.push(current.to_path_buf());
            dir = current.parent();
        }

        for dir in missing.into_iter().rev() {
            let meta = match self.dir_meta.get(&dir) {
                Some(meta) => meta.clone(),
                None => fs::symlink_metadata(&dir).map_err(|e| PackError::path(&dir, e))?,
            };
            let mut header = self.header_for(&meta)?;
            let name = self.relative(&dir);
            tracing::debug!("  dir  {}", name.display());
            append_entry(
                &mut self.builder,
                &mut header,
                &name,
                None,
                Vec::new(),
                self.build_time,
                std::io::empty(),
            )
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
            self.written_dirs.insert(dir);
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, meta: &Metadata) -> Result<()> {
        let checksum =
            digest_file(path, DigestAlgorithm::Sha1).map_err(|e| PackError::path(path, e))?;
        let mut header = self.header_for(meta)?;
        let name = self.relative(path);
        let file = File::open(path).map_err(|e| PackError::path(path, e))?;

        tracing::debug!("  file {} ({} bytes)", name.display(), meta.len());
        // A file that grows while being archived must not overrun its header.
        append_entry(
            &mut self.builder,
            &mut header,
            &name,
            None,
            vec![(CHECKSUM_PAX_KEY, checksum.into_bytes())],
            self.build_time,
            file.take(meta.len()),
        )
        .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;

        self.size += meta.len();
        Ok(())
    }

    fn write_symlink(&mut self, path: &Path, meta: &Metadata) -> Result<()> {
        let target = fs::read_link(path).map_err(|e| PackError::path(path, e))?;
        let checksum = digest_bytes(target.as_os_str().as_encoded_bytes(), DigestAlgorithm::Sha1);
        let mut header = self.header_for(meta)?;
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        let name = self.relative(path);

        tracing::debug!("  link {} -> {}", name.display(), target.display());
        append_entry(
            &mut self.builder,
            &mut header,
            &name,
            Some(&target),
            vec![(CHECKSUM_PAX_KEY, checksum.into_bytes())],
            self.build_time,
            std::io::empty(),
        )
        .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        Ok(())
    }

    fn header_for(&self, meta: &Metadata) -> Result<Header> {
        let mut header = Header::new_ustar();
        header.set_metadata_in_mode(meta, HeaderMode::Complete);
        let mode = header
            .mode()
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        header.set_mode(mode & 0o7777);
        normalize_header(&mut header, self.build_time)
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        Ok(header)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root).unwrap_or(path).to_path_buf()
    }

    /// Write the end-of-archive marker, flush everything, and return the
    /// accumulated file size.
    fn finish(self) -> Result<u64> {
        let size = self.size;
        let encoder = self
            .builder
            .into_inner()
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        let mut writer = encoder
            .finish()
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        writer
            .flush()
            .map_err(|e| PackError::archive(DATA_ARCHIVE, e))?;
        Ok(size)
    }
}
