//! Shared types for apkpack.
//!
//! Value types with no I/O beyond hashing: the `.PKGINFO` record, the two
//! digest newtypes apk-tools expects, and the target architecture.

pub mod arch;
pub mod hash;
pub mod pkginfo;

// Re-exports
pub use arch::*;
pub use hash::*;
pub use pkginfo::{PkgInfo, field};

/// File extension of Alpine packages.
pub const APK_EXTENSION: &str = "apk";

/// PAX record carrying the per-file SHA-1 inside the data archive.
pub const CHECKSUM_PAX_KEY: &str = "APK-TOOLS.checksum.SHA1";

/// Entry name of the control segment.
pub const PKGINFO_ENTRY: &str = ".PKGINFO";
