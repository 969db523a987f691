//! Package signing.
//!
//! apk verifies an RSA PKCS#1 v1.5 signature over the SHA-1 digest of the
//! compressed control segment. The signature is stored in its own segment
//! named after the signing key, which is how apk finds the public key under
//! `/etc/apk/keys`.

use std::path::{Path, PathBuf};

use apkpack_schema::Sha1Hash;
use rsa::pkcs1::ALGORITHM_OID as RSA_ALGORITHM_OID;
use rsa::pkcs8::{PrivateKeyInfo, SecretDocument};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

use crate::error::{PackError, Result};

/// PEM label of an unencrypted PKCS#8 private key.
const PKCS8_PEM_LABEL: &str = "PRIVATE KEY";

/// An RSA private key loaded from a PEM-encoded PKCS#8 file.
#[derive(Debug)]
pub struct SigningKey {
    key: RsaPrivateKey,
    name: String,
}

impl SigningKey {
    /// Load the key at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Path`] if the file cannot be read,
    /// [`PackError::KeyParse`] if it is not a PKCS#8 PEM key, and
    /// [`PackError::UnsupportedKey`] if the key is not RSA.
    pub fn from_file(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path).map_err(|e| PackError::path(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(PackError::MissingArgument("key file name"))?;
        Self::from_pem(&pem, name, path)
    }

    /// Decode a PEM key. `name` is the key's file name, used in the signature
    /// entry; `origin` only appears in error messages.
    ///
    /// # Errors
    ///
    /// See [`SigningKey::from_file`].
    pub fn from_pem(pem: &str, name: impl Into<String>, origin: &Path) -> Result<Self> {
        let parse_err = |message: String| PackError::KeyParse {
            path: origin.to_path_buf(),
            message,
        };

        let (label, document) = SecretDocument::from_pem(pem).map_err(|e| parse_err(e.to_string()))?;
        if label != PKCS8_PEM_LABEL {
            return Err(parse_err(format!(
                "expected a '{PKCS8_PEM_LABEL}' PEM block, found '{label}'"
            )));
        }

        let info = PrivateKeyInfo::try_from(document.as_bytes())
            .map_err(|e| parse_err(e.to_string()))?;
        if info.algorithm.oid != RSA_ALGORITHM_OID {
            return Err(PackError::UnsupportedKey {
                path: origin.to_path_buf(),
                algorithm: info.algorithm.oid.to_string(),
            });
        }

        let key = RsaPrivateKey::try_from(info).map_err(|e| parse_err(e.to_string()))?;
        Ok(Self {
            key,
            name: name.into(),
        })
    }

    /// File name of the key, e.g. `builder@example.org-5f3a.rsa`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the signature entry: `.SIGN.RSA.<key name>.pub`.
    pub fn signature_entry_name(&self) -> String {
        format!(".SIGN.RSA.{}.pub", self.name)
    }

    /// Sign an already compressed segment: SHA-1 over its bytes, then
    /// RSA PKCS#1 v1.5 over that digest.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Signing`] if the RSA operation fails.
    pub fn sign(&self, segment: &[u8]) -> Result<Vec<u8>> {
        let digest = Sha1::digest(segment);
        tracing::debug!(
            "Signing control segment (sha1 {}) with {}",
            Sha1Hash::compute(segment),
            self.name
        );
        Ok(self.key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)?)
    }

    /// The path apk expects the matching public key under.
    pub fn public_key_path(&self) -> PathBuf {
        Path::new("/etc/apk/keys").join(format!("{}.pub", self.name))
    }
}
