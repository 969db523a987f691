//! Target architectures.

/// Target architecture of an Alpine package.
///
/// The string form is the one apk-tools uses in `.PKGINFO` (`arch = ...`)
/// and in package file names. Documentation and other data-only packages
/// use [`Arch::Noarch`].
///
/// # Example
///
/// ```
/// use apkpack_schema::Arch;
///
/// let arch: Arch = "amd64".parse().unwrap();
/// assert_eq!(arch, Arch::X86_64);
/// assert_eq!(arch.to_string(), "x86_64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit ARM.
    Aarch64,
    /// 32-bit ARMv6 hard-float.
    Armhf,
    /// 32-bit ARMv7 hard-float.
    Armv7,
    /// 64-bit `LoongArch`.
    Loongarch64,
    /// 64-bit little-endian `PowerPC`.
    Ppc64le,
    /// 64-bit RISC-V.
    Riscv64,
    /// IBM Z.
    S390x,
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    X86_64,
    /// Architecture independent content.
    Noarch,
}

impl Arch {
    /// Every architecture apk-tools knows about, in display order.
    pub const ALL: [Self; 10] = [
        Self::Aarch64,
        Self::Armhf,
        Self::Armv7,
        Self::Loongarch64,
        Self::Ppc64le,
        Self::Riscv64,
        Self::S390x,
        Self::X86,
        Self::X86_64,
        Self::Noarch,
    ];

    /// The architecture string as written into `.PKGINFO`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::Armhf => "armhf",
            Self::Armv7 => "armv7",
            Self::Loongarch64 => "loongarch64",
            Self::Ppc64le => "ppc64le",
            Self::Riscv64 => "riscv64",
            Self::S390x => "s390x",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Noarch => "noarch",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown architecture string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown architecture: {0}")]
pub struct UnknownArch(pub String);

impl std::str::FromStr for Arch {
    type Err = UnknownArch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            "armhf" => Ok(Self::Armhf),
            "armv7" => Ok(Self::Armv7),
            "loongarch64" => Ok(Self::Loongarch64),
            "ppc64le" => Ok(Self::Ppc64le),
            "riscv64" => Ok(Self::Riscv64),
            "s390x" => Ok(Self::S390x),
            "x86" | "i686" | "i386" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "noarch" => Ok(Self::Noarch),
            _ => Err(UnknownArch(s.to_string())),
        }
    }
}
