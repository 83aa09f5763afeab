// SPDX-License-Identifier: PMPL-1.0-or-later
//! Elliptic-curve keys — length is the nominal size of the named curve.
//!
//! Only the three NIST prime curves are resolved. Any other curve decodes
//! successfully but reports length 0, which never meets a threshold.

use super::{Algorithm, KeyLengthEvaluator};
use crate::error::ParseError;
use crate::keys::{public_key_algorithm_name, OID_EC_PUBLIC_KEY};
use x509_parser::prelude::FromDer;
use x509_parser::x509::SubjectPublicKeyInfo;

/// Recommended curve size for `year`.
pub fn recommended_length(year: i32) -> u32 {
    match year {
        i32::MIN..=2030 => 256,
        2031..=2040 => 384,
        _ => 521,
    }
}

/// Named curves with a known bit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCurve {
    P256,
    P384,
    P521,
}

impl NamedCurve {
    pub fn from_oid(oid: &str) -> Option<Self> {
        match oid {
            "1.2.840.10045.3.1.7" => Some(NamedCurve::P256),
            "1.3.132.0.34" => Some(NamedCurve::P384),
            "1.3.132.0.35" => Some(NamedCurve::P521),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            NamedCurve::P256 => 256,
            NamedCurve::P384 => 384,
            NamedCurve::P521 => 521,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedCurve::P256 => "P-256",
            NamedCurve::P384 => "P-384",
            NamedCurve::P521 => "P-521",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EccKey {
    /// Curve OID from the key's algorithm parameters, if any.
    curve_oid: Option<String>,
    from_certificate: bool,
}

impl EccKey {
    /// Decode the EC key carried by a SubjectPublicKeyInfo.
    pub fn from_spki(spki: &SubjectPublicKeyInfo<'_>, from_certificate: bool) -> Result<Self, ParseError> {
        if spki.algorithm.algorithm.to_id_string() != OID_EC_PUBLIC_KEY {
            return Err(ParseError::WrongAlgorithmInEnvelope {
                expected: "EC".to_string(),
                found: public_key_algorithm_name(&spki.algorithm.algorithm.to_id_string()),
            });
        }

        let curve_oid = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|params| params.as_oid().ok())
            .map(|oid| oid.to_id_string());

        Ok(Self {
            curve_oid,
            from_certificate,
        })
    }

    /// Decode an `EC PUBLIC KEY` payload (SubjectPublicKeyInfo).
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, ParseError> {
        if der.is_empty() {
            return Err(ParseError::NilInput);
        }

        let (_, spki) = SubjectPublicKeyInfo::from_der(der).map_err(|e| {
            ParseError::UnsupportedKeyFormat(format!("failed to parse PEM EC public key: {e}"))
        })?;
        Self::from_spki(&spki, false)
    }

    pub fn curve(&self) -> Option<NamedCurve> {
        self.curve_oid.as_deref().and_then(NamedCurve::from_oid)
    }

    pub fn curve_oid(&self) -> Option<&str> {
        self.curve_oid.as_deref()
    }

    pub fn is_from_certificate(&self) -> bool {
        self.from_certificate
    }
}

impl KeyLengthEvaluator for EccKey {
    fn length(&self) -> u32 {
        self.curve().map_or(0, NamedCurve::bits)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Ecc
    }

    fn adjust_for_year(&self, year: i32) -> u32 {
        recommended_length(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_on(oid: Option<&str>) -> EccKey {
        EccKey {
            curve_oid: oid.map(String::from),
            from_certificate: false,
        }
    }

    #[test]
    fn test_curve_lengths() {
        assert_eq!(key_on(Some("1.2.840.10045.3.1.7")).length(), 256);
        assert_eq!(key_on(Some("1.3.132.0.34")).length(), 384);
        assert_eq!(key_on(Some("1.3.132.0.35")).length(), 521);
    }

    #[test]
    fn test_unresolved_curve_is_zero() {
        // secp256k1
        let key = key_on(Some("1.3.132.0.10"));
        assert_eq!(key.curve(), None);
        assert_eq!(key.length(), 0);
        assert!(!key.is_secure(1));
        assert_eq!(key_on(None).length(), 0);
    }

    #[test]
    fn test_is_secure() {
        let cases = [
            ("1.2.840.10045.3.1.7", 256, true),
            ("1.2.840.10045.3.1.7", 384, false),
            ("1.3.132.0.34", 256, true),
            ("1.3.132.0.34", 384, true),
            ("1.3.132.0.35", 384, true),
            ("1.3.132.0.35", 521, true),
        ];
        for (oid, threshold, expected) in cases {
            assert_eq!(key_on(Some(oid)).is_secure(threshold), expected, "{oid} @ {threshold}");
        }
    }

    #[test]
    fn test_adjust_for_year() {
        let key = key_on(Some("1.2.840.10045.3.1.7"));
        let cases = [
            (2025, 256),
            (2030, 256),
            (2031, 384),
            (2040, 384),
            (2041, 521),
            (2100, 521),
        ];
        for (year, expected) in cases {
            assert_eq!(key.adjust_for_year(year), expected, "year {year}");
        }
    }

    #[test]
    fn test_curve_names() {
        assert_eq!(NamedCurve::P256.name(), "P-256");
        assert_eq!(NamedCurve::from_oid("1.3.132.0.35"), Some(NamedCurve::P521));
        assert_eq!(NamedCurve::from_oid("1.2.3"), None);
    }

    #[test]
    fn test_garbage_public_key() {
        assert_eq!(EccKey::from_public_key_der(&[]), Err(ParseError::NilInput));
        let err = EccKey::from_public_key_der(b"garbage").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedKeyFormat(_)));
    }
}
