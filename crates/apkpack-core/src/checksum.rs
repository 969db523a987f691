//! Content digests used by the package format.
//!
//! The two algorithms are not interchangeable. SHA-1 is what apk-tools reads
//! from the per-file PAX record and what the signature covers; SHA-256 is the
//! `datahash` of the compressed data archive.

use std::path::Path;

use apkpack_schema::{Sha1Hash, Sha256Hash};

/// Which digest to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// Legacy digest: per-file checksums and the signed control digest.
    Sha1,
    /// Strong digest: `datahash`.
    Sha256,
}

/// Hex digest of an in-memory buffer.
pub fn digest_bytes(data: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Sha1 => Sha1Hash::compute(data).into(),
        DigestAlgorithm::Sha256 => Sha256Hash::compute(data).into(),
    }
}

/// Hex digest of a file's contents.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn digest_file(path: &Path, algorithm: DigestAlgorithm) -> std::io::Result<String> {
    Ok(match algorithm {
        DigestAlgorithm::Sha1 => Sha1Hash::compute_file(path)?.into(),
        DigestAlgorithm::Sha256 => Sha256Hash::compute_file(path)?.into(),
    })
}
