//! Core library for apkpack.
//!
//! Turns a directory tree into signed Alpine `.apk` packages: a signature
//! segment, a `.PKGINFO` control segment and a data archive, each an
//! independent gzip member, concatenated into one file.
//!
//! Given the same tree, key and [`BuildTime`], the output is byte-for-byte
//! identical.

pub mod assemble;
pub mod build_time;
pub mod checksum;
pub mod config;
pub mod data;
pub mod error;
pub mod package;
pub mod segment;
pub mod signer;
pub mod variant;

pub use assemble::{BuiltPackage, assemble, build_packages, package_file_name};
pub use build_time::BuildTime;
pub use config::BuildConfig;
pub use error::{PackError, Result};
pub use package::PackageInfo;
pub use signer::SigningKey;
pub use variant::{Variant, is_doc_path};
