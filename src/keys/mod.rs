// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key material — the three key kinds whose strength we measure.
//!
//! Each kind owns its decoded representation and implements
//! [`KeyLengthEvaluator`]. [`KeyMaterial`] is the closed sum over the three,
//! which is what the parser produces and the evaluator consumes.

pub mod ecc;
pub mod rsa;
pub mod symmetric;

pub use ecc::{EccKey, NamedCurve};
pub use rsa::{RsaKey, RsaKeyForm};
pub use symmetric::SymmetricKey;

use serde::Serialize;
use std::fmt;

/// Algorithm family of a key, as used for threshold lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "ECC")]
    Ecc,
    Symmetric,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Rsa, Algorithm::Ecc, Algorithm::Symmetric];

    /// Tag used as the key in standards files.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Rsa => "RSA",
            Algorithm::Ecc => "ECC",
            Algorithm::Symmetric => "Symmetric",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set shared by every key kind.
pub trait KeyLengthEvaluator {
    /// Effective key length in bits.
    fn length(&self) -> u32;

    fn algorithm(&self) -> Algorithm;

    /// Whether the key meets `threshold` bits.
    fn is_secure(&self, threshold: u32) -> bool {
        self.length() >= threshold
    }

    /// Recommended minimum length for this algorithm in `year`.
    fn adjust_for_year(&self, year: i32) -> u32;
}

/// A classified key of any supported kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Rsa(RsaKey),
    Ecc(EccKey),
    Symmetric(SymmetricKey),
}

impl KeyMaterial {
    fn inner(&self) -> &dyn KeyLengthEvaluator {
        match self {
            KeyMaterial::Rsa(key) => key,
            KeyMaterial::Ecc(key) => key,
            KeyMaterial::Symmetric(key) => key,
        }
    }
}

impl KeyLengthEvaluator for KeyMaterial {
    fn length(&self) -> u32 {
        self.inner().length()
    }

    fn algorithm(&self) -> Algorithm {
        self.inner().algorithm()
    }

    fn is_secure(&self, threshold: u32) -> bool {
        self.inner().is_secure(threshold)
    }

    fn adjust_for_year(&self, year: i32) -> u32 {
        self.inner().adjust_for_year(year)
    }
}

impl From<RsaKey> for KeyMaterial {
    fn from(key: RsaKey) -> Self {
        KeyMaterial::Rsa(key)
    }
}

impl From<EccKey> for KeyMaterial {
    fn from(key: EccKey) -> Self {
        KeyMaterial::Ecc(key)
    }
}

impl From<SymmetricKey> for KeyMaterial {
    fn from(key: SymmetricKey) -> Self {
        KeyMaterial::Symmetric(key)
    }
}

pub(crate) const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub(crate) const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// Readable name for a SubjectPublicKeyInfo algorithm OID.
pub(crate) fn public_key_algorithm_name(oid: &str) -> String {
    match oid {
        OID_RSA_ENCRYPTION => "RSA",
        "1.2.840.113549.1.1.10" => "RSASSA-PSS",
        OID_EC_PUBLIC_KEY => "ECDSA",
        "1.2.840.10040.4.1" => "DSA",
        "1.3.101.110" => "X25519",
        "1.3.101.111" => "X448",
        "1.3.101.112" => "Ed25519",
        "1.3.101.113" => "Ed448",
        other => return other.to_string(),
    }
    .to_string()
}

/// Recommended minimum length for `algorithm` in `year`, without needing a key.
pub fn recommended_length(algorithm: Algorithm, year: i32) -> u32 {
    match algorithm {
        Algorithm::Rsa => rsa::recommended_length(year),
        Algorithm::Ecc => ecc::recommended_length(year),
        Algorithm::Symmetric => symmetric::recommended_length(year),
    }
}
