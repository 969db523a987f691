//! Digest newtypes.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Read buffer used when hashing files and readers (64KB).
const HASH_BUFFER_SIZE: usize = 64 * 1024;

fn hash_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// SHA-1 digest as 40 lowercase hex characters.
///
/// apk-tools still uses SHA-1 in two places: the per-file
/// `APK-TOOLS.checksum.SHA1` PAX record, and the digest of the control
/// segment that the package signature covers. Nothing else should use it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha1Hash(String);

impl Sha1Hash {
    /// Compute the SHA-1 of an in-memory buffer.
    pub fn compute(data: &[u8]) -> Self {
        Self(hex::encode(Sha1::digest(data)))
    }

    /// Compute the SHA-1 of everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn compute_reader(reader: impl Read) -> std::io::Result<Self> {
        hash_reader::<Sha1>(reader).map(Self)
    }

    /// Compute the SHA-1 of a file, streaming its contents.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn compute_file(path: &Path) -> std::io::Result<Self> {
        Self::compute_reader(std::fs::File::open(path)?)
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SHA-256 digest as 64 lowercase hex characters.
///
/// Used for `datahash`, the digest of the compressed data archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Compute the SHA-256 of an in-memory buffer.
    pub fn compute(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Compute the SHA-256 of everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn compute_reader(reader: impl Read) -> std::io::Result<Self> {
        hash_reader::<Sha256>(reader).map(Self)
    }

    /// Compute the SHA-256 of a file, streaming its contents.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn compute_file(path: &Path) -> std::io::Result<Self> {
        Self::compute_reader(std::fs::File::open(path)?)
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_hash_str {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$ty> for String {
            fn from(hash: $ty) -> Self {
                hash.0
            }
        }
    };
}

impl_hash_str!(Sha1Hash);
impl_hash_str!(Sha256Hash);
