// SPDX-License-Identifier: PMPL-1.0-or-later
//! keylength — Key Length & Certificate Strength Checker
//!
//! Measures the effective length of RSA, ECC and symmetric keys and judges
//! it against a named security standard (NIST, BSI, ANSSI, ECRYPT, or any
//! standard defined in the JSON catalog).
//!
//! ## Inputs
//!
//! - PEM envelopes: `RSA PUBLIC KEY`, `RSA PRIVATE KEY`, `EC PUBLIC KEY`, `CERTIFICATE`
//! - DER-encoded X.509 certificates
//! - Leaf certificates presented by live TLS endpoints
//!
//! ## Flow
//!
//! bytes -> [`parse::parse`] -> [`KeyMaterial`] -> [`eval::evaluate`] -> [`EvaluationResult`]
//!
//! [`scan::Scanner`] runs the same flow per port against a TLS host.

pub mod cli;
pub mod error;
pub mod eval;
pub mod keys;
pub mod parse;
pub mod scan;
pub mod standards;
pub mod tls;

pub use error::{ConfigError, ConnectionError, KeylengthError, ParseError, Result};
pub use eval::{evaluate, EvaluationContext, EvaluationResult};
pub use keys::{Algorithm, KeyLengthEvaluator, KeyMaterial};
pub use scan::{PortScanResult, ScanOptions, ScanReport, Scanner};
pub use standards::{Standard, StandardsCatalog, StandardsConfig};
pub use tls::{CertificateFetcher, TlsCertificateFetcher};
