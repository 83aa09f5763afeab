// SPDX-License-Identifier: PMPL-1.0-or-later
//! Key Parser — classifies raw PEM or DER bytes into [`KeyMaterial`].
//!
//! Dispatch is two-level:
//!
//! 1. PEM envelope label
//!    - `RSA PUBLIC KEY`, `RSA PRIVATE KEY` -> RSA
//!    - `EC PUBLIC KEY` -> ECC
//!    - `CERTIFICATE` -> step 2
//!    - anything else -> [`ParseError::UnsupportedPemType`]
//! 2. Certificate public-key algorithm
//!    - rsaEncryption -> RSA
//!    - id-ecPublicKey -> ECC
//!    - anything else -> [`ParseError::UnsupportedCertificateAlgorithm`]
//!
//! Input without a PEM envelope is tried as a DER certificate before giving up
//! with [`ParseError::UnrecognizedFormat`].

use crate::error::{KeylengthError, ParseError};
use crate::keys::{
    public_key_algorithm_name, EccKey, KeyMaterial, RsaKey, RsaKeyForm, OID_EC_PUBLIC_KEY,
    OID_RSA_ENCRYPTION,
};
use std::path::Path;
use tracing::debug;
use x509_parser::certificate::X509Certificate;
use x509_parser::pem::{parse_x509_pem, Pem};
use x509_parser::prelude::FromDer;

pub const PEM_RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";
pub const PEM_RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
pub const PEM_EC_PUBLIC_KEY: &str = "EC PUBLIC KEY";
pub const PEM_CERTIFICATE: &str = "CERTIFICATE";

/// Classify `data` as RSA or ECC key material.
pub fn parse(data: &[u8]) -> Result<KeyMaterial, ParseError> {
    if data.is_empty() {
        return Err(ParseError::NilInput);
    }

    if let Some(pem) = decode_pem(data) {
        debug!(label = %pem.label, bytes = pem.contents.len(), "Decoded PEM envelope");
        return parse_pem(&pem);
    }

    match X509Certificate::from_der(data) {
        Ok((rest, _)) if !rest.is_empty() => {
            debug!(trailing = rest.len(), "DER certificate followed by trailing data");
            Err(ParseError::UnrecognizedFormat)
        }
        Ok((_, cert)) => {
            debug!("Decoded DER certificate");
            key_from_certificate(&cert)
        }
        Err(e) => {
            debug!(error = %e, "Input is neither PEM nor a DER certificate");
            Err(ParseError::UnrecognizedFormat)
        }
    }
}

/// Read `path` and classify its contents.
pub fn parse_file(path: &Path) -> Result<KeyMaterial, KeylengthError> {
    let data = std::fs::read(path)?;
    Ok(parse(&data)?)
}

fn parse_pem(pem: &Pem) -> Result<KeyMaterial, ParseError> {
    match pem.label.as_str() {
        PEM_RSA_PUBLIC_KEY => RsaKey::from_public_key_der(&pem.contents).map(KeyMaterial::Rsa),
        PEM_RSA_PRIVATE_KEY => RsaKey::from_private_key_der(&pem.contents).map(KeyMaterial::Rsa),
        PEM_EC_PUBLIC_KEY => EccKey::from_public_key_der(&pem.contents).map(KeyMaterial::Ecc),
        PEM_CERTIFICATE => {
            let cert = decode_certificate(&pem.contents)?;
            key_from_certificate(&cert)
        }
        other => Err(ParseError::UnsupportedPemType(other.to_string())),
    }
}

/// Classify the subject public key of an already-decoded certificate.
pub fn key_from_certificate(cert: &X509Certificate<'_>) -> Result<KeyMaterial, ParseError> {
    let spki = cert.public_key();
    let oid = spki.algorithm.algorithm.to_id_string();

    match oid.as_str() {
        OID_RSA_ENCRYPTION => RsaKey::from_spki(spki, RsaKeyForm::Certificate).map(KeyMaterial::Rsa),
        OID_EC_PUBLIC_KEY => EccKey::from_spki(spki, true).map(KeyMaterial::Ecc),
        other => Err(ParseError::UnsupportedCertificateAlgorithm(
            public_key_algorithm_name(other),
        )),
    }
}

/// First PEM envelope in `data`, if there is one.
pub(crate) fn decode_pem(data: &[u8]) -> Option<Pem> {
    parse_x509_pem(data).ok().map(|(_, pem)| pem)
}

/// Decode DER certificate bytes.
pub(crate) fn decode_certificate(der: &[u8]) -> Result<X509Certificate<'_>, ParseError> {
    X509Certificate::from_der(der)
        .map(|(_, cert)| cert)
        .map_err(|e| ParseError::InvalidCertificate(e.to_string()))
}
