// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for keylength.
//!
//! Three failure domains, each with its own enum:
//! - [`ConfigError`]: loading the standards catalog. Fatal for the operation.
//! - [`ParseError`]: turning bytes into key material. Fatal for that one input.
//! - [`ConnectionError`]: reaching a TLS endpoint. Isolated per port by the scanner.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or selecting a security standard.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("standards file path cannot be empty")]
    EmptySourcePath,

    #[error("failed to read standards file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse standards JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid standard: {0}")]
    UnknownStandard(String),
}

/// Failures while classifying key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input data cannot be empty")]
    NilInput,

    #[error("unrecognized key format: expected a PEM envelope or a DER certificate")]
    UnrecognizedFormat,

    #[error("unsupported PEM block type: {0}")]
    UnsupportedPemType(String),

    #[error("unsupported key algorithm in certificate: {0}")]
    UnsupportedCertificateAlgorithm(String),

    #[error("unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    #[error("PEM envelope declares {expected} but payload holds a {found} key")]
    WrongAlgorithmInEnvelope { expected: String, found: String },

    #[error("failed to decode certificate: {0}")]
    InvalidCertificate(String),
}

/// Failures while fetching a peer certificate chain.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no addresses found for {0}")]
    NoAddress(String),

    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),
}

/// Umbrella error for library entry points that cross domains.
#[derive(Error, Debug)]
pub enum KeylengthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, KeylengthError>;
