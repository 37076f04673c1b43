//! Stored-password comparison schemes.
//!
//! Stored salted values use the form `sha256$<salt_hex>$<digest_hex>` where
//! the digest is SHA-256 over the salt bytes followed by the password bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

const SCHEME_TAG: &str = "sha256";

/// How a stored password value is compared with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordScheme {
    /// Stored value is the password itself.
    #[default]
    Plaintext,
    /// Stored value is a [`SaltedDigest`].
    SaltedSha256,
}

impl PasswordScheme {
    /// Constant-time comparison of `candidate` against `stored`.
    ///
    /// A stored value that does not parse under the scheme never matches.
    pub fn matches(&self, stored: &str, candidate: &str) -> bool {
        match self {
            Self::Plaintext => bool::from(stored.as_bytes().ct_eq(candidate.as_bytes())),
            Self::SaltedSha256 => SaltedDigest::parse(stored)
                .map(|digest| digest.verify(candidate))
                .unwrap_or(false),
        }
    }
}

/// Salted one-way password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedDigest {
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl SaltedDigest {
    /// Digest of `password` under a fresh random 16-byte salt.
    pub fn generate(password: &str) -> Self {
        Self::compute(Uuid::new_v4().as_bytes(), password)
    }

    /// Digest of `password` under the given salt.
    pub fn compute(salt: &[u8], password: &str) -> Self {
        Self {
            salt: salt.to_vec(),
            digest: digest(salt, password),
        }
    }

    /// Parses `sha256$<salt_hex>$<digest_hex>`.
    pub fn parse(stored: &str) -> Option<Self> {
        let mut parts = stored.split('$');
        if parts.next()? != SCHEME_TAG {
            return None;
        }
        let salt = hex::decode(parts.next()?).ok()?;
        let digest = hex::decode(parts.next()?).ok()?;
        if parts.next().is_some() || salt.is_empty() || digest.len() != 32 {
            return None;
        }
        Some(Self { salt, digest })
    }

    /// Recomputes the digest for `candidate` and compares in constant time.
    pub fn verify(&self, candidate: &str) -> bool {
        let computed = digest(&self.salt, candidate);
        bool::from(computed.as_slice().ct_eq(self.digest.as_slice()))
    }

    /// Storage form.
    pub fn encode(&self) -> String {
        format!(
            "{}${}${}",
            SCHEME_TAG,
            hex::encode(&self.salt),
            hex::encode(&self.digest)
        )
    }
}

impl std::fmt::Display for SaltedDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
