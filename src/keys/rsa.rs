// SPDX-License-Identifier: PMPL-1.0-or-later
//! RSA keys — length is the bit length of the public modulus.
//!
//! | Form         | Source                                                |
//! |--------------|-------------------------------------------------------|
//! | Certificate  | SubjectPublicKeyInfo of an X.509 certificate          |
//! | PublicKey    | `RSA PUBLIC KEY` envelope (SPKI or PKCS#1 payload)    |
//! | PrivateKey   | `RSA PRIVATE KEY` envelope (PKCS#1), public modulus   |

use super::{Algorithm, KeyLengthEvaluator};
use crate::error::ParseError;
use crate::keys::{public_key_algorithm_name, OID_RSA_ENCRYPTION};
use rsa::pkcs1;
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

/// Recommended RSA modulus size for `year`.
///
/// | Year        | Bits |
/// |-------------|------|
/// | ..=2030     | 2048 |
/// | 2031..=2050 | 3072 |
/// | 2051..      | 4096 |
pub fn recommended_length(year: i32) -> u32 {
    match year {
        i32::MIN..=2030 => 2048,
        2031..=2050 => 3072,
        _ => 4096,
    }
}

/// Where an [`RsaKey`] was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaKeyForm {
    Certificate,
    PublicKey,
    PrivateKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    form: RsaKeyForm,
    /// Big-endian modulus, leading zero bytes stripped.
    modulus: Vec<u8>,
}

impl RsaKey {
    /// Decode the RSA key carried by a SubjectPublicKeyInfo.
    pub fn from_spki(spki: &SubjectPublicKeyInfo<'_>, form: RsaKeyForm) -> Result<Self, ParseError> {
        if spki.algorithm.algorithm.to_id_string() != OID_RSA_ENCRYPTION {
            return Err(ParseError::WrongAlgorithmInEnvelope {
                expected: "RSA".to_string(),
                found: public_key_algorithm_name(&spki.algorithm.algorithm.to_id_string()),
            });
        }

        match spki.parsed() {
            Ok(PublicKey::RSA(rsa)) => Ok(Self::from_modulus(rsa.modulus, form)),
            Ok(_) => Err(ParseError::UnsupportedKeyFormat(
                "RSA algorithm identifier with non-RSA key data".to_string(),
            )),
            Err(e) => Err(ParseError::UnsupportedKeyFormat(format!(
                "failed to decode RSA public key: {e}"
            ))),
        }
    }

    /// Decode an `RSA PUBLIC KEY` payload.
    ///
    /// Accepts SubjectPublicKeyInfo first, then a bare PKCS#1 `RSAPublicKey`.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, ParseError> {
        if der.is_empty() {
            return Err(ParseError::NilInput);
        }

        if let Ok((_, spki)) = SubjectPublicKeyInfo::from_der(der) {
            return Self::from_spki(&spki, RsaKeyForm::PublicKey);
        }

        pkcs1::RsaPublicKey::try_from(der)
            .map(|key| Self::from_modulus(key.modulus.as_bytes(), RsaKeyForm::PublicKey))
            .map_err(|e| {
                ParseError::UnsupportedKeyFormat(format!("failed to parse PEM RSA public key: {e}"))
            })
    }

    /// Decode an `RSA PRIVATE KEY` (PKCS#1) payload, keeping only the modulus.
    pub fn from_private_key_der(der: &[u8]) -> Result<Self, ParseError> {
        if der.is_empty() {
            return Err(ParseError::NilInput);
        }

        pkcs1::RsaPrivateKey::try_from(der)
            .map(|key| Self::from_modulus(key.modulus.as_bytes(), RsaKeyForm::PrivateKey))
            .map_err(|e| {
                ParseError::UnsupportedKeyFormat(format!("failed to parse PEM RSA private key: {e}"))
            })
    }

    fn from_modulus(modulus: &[u8], form: RsaKeyForm) -> Self {
        let start = modulus.iter().position(|&b| b != 0).unwrap_or(modulus.len());
        Self {
            form,
            modulus: modulus[start..].to_vec(),
        }
    }

    pub fn form(&self) -> RsaKeyForm {
        self.form
    }

    pub fn is_private(&self) -> bool {
        self.form == RsaKeyForm::PrivateKey
    }
}

impl KeyLengthEvaluator for RsaKey {
    fn length(&self) -> u32 {
        match self.modulus.first() {
            Some(&top) => (self.modulus.len() as u32 - 1) * 8 + (8 - top.leading_zeros()),
            None => 0,
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Rsa
    }

    fn adjust_for_year(&self, year: i32) -> u32 {
        recommended_length(year)
    }
}
