//! Domain-specific errors for package assembly

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PackError> = std::result::Result<T, E>;

/// Everything that can abort a package build.
///
/// None of these are retried: the current variant fails and the error is
/// handed back to the caller.
#[derive(Error, Debug)]
pub enum PackError {
    /// A required input was missing or empty.
    #[error("missing {0}")]
    MissingArgument(&'static str),

    /// The package root is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// An I/O error outside archive writing (reading sources, creating outputs).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error tied to a specific path.
    #[error("{}: {source}", .path.display())]
    Path {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The source tree could not be walked.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The tar or gzip writer failed.
    #[error("failed to write {archive}: {source}")]
    Archive {
        /// Which archive was being written (`.PKGINFO`, the data archive, ...).
        archive: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The private key could not be decoded.
    #[error("invalid private key {}: {message}", .path.display())]
    KeyParse {
        /// Key file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The private key is not an RSA key.
    #[error("unsupported key type {algorithm} in {}: only RSA keys can sign packages", .path.display())]
    UnsupportedKey {
        /// Key file.
        path: PathBuf,
        /// Algorithm OID found in the key.
        algorithm: String,
    },

    /// The RSA signing operation failed.
    #[error("signing failed: {0}")]
    Signing(#[from] rsa::Error),

    /// `SOURCE_DATE_EPOCH` is not a non-negative integer.
    #[error("invalid SOURCE_DATE_EPOCH '{0}': expected Unix seconds")]
    InvalidTimestamp(String),

    /// The package info file is not valid TOML or lacks required fields.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl PackError {
    /// Attach the path that failed to an I/O error.
    pub fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }

    /// Wrap a tar/gzip writer error.
    pub fn archive(archive: impl Into<String>, source: std::io::Error) -> Self {
        Self::Archive {
            archive: archive.into(),
            source,
        }
    }
}
