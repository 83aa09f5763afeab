// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scan Orchestrator — evaluates the leaf certificate of each port on a host.
//!
//! Ports are scanned sequentially in input order. A failing port is recorded
//! as a result row and never stops the remaining ports, so the report always
//! holds exactly one row per requested port.
//!
//! | Outcome                    | `status`              |
//! |----------------------------|-----------------------|
//! | dial / handshake failure   | `Connection Failed`   |
//! | empty peer chain           | `No Certificate`      |
//! | leaf not RSA / ECC         | `Parsing Failed`      |
//! | evaluated                  | `Secure (..)` / `Insecure (..)` |

use crate::error::KeylengthError;
use crate::eval::{self, EvaluationContext};
use crate::parse;
use crate::standards::StandardsConfig;
use crate::tls::CertificateFetcher;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

pub const STATUS_CONNECTION_FAILED: &str = "Connection Failed";
pub const STATUS_NO_CERTIFICATE: &str = "No Certificate";
pub const STATUS_PARSING_FAILED: &str = "Parsing Failed";

/// Per-connection timeout when the caller gives none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub timeout: Duration,
    /// Attach expiry information to evaluated rows.
    pub check_expiry: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            check_expiry: false,
        }
    }
}

/// Outcome for one scanned port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortScanResult {
    pub port: String,
    pub status: String,
    pub algorithm: String,
    pub length: u32,
    pub detail: String,
    /// Whether the leaf key met the standard. `false` for failed rows.
    pub secure: bool,
    /// Whether the row carries an evaluation at all.
    pub evaluated: bool,
}

impl PortScanResult {
    fn failed(port: &str, status: &str, detail: String) -> Self {
        Self {
            port: port.to_string(),
            status: status.to_string(),
            algorithm: String::new(),
            length: 0,
            detail,
            secure: false,
            evaluated: false,
        }
    }
}

/// All rows for one host, in port order, plus summary counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub host: String,
    pub results: Vec<PortScanResult>,
    pub ports_scanned: usize,
    pub evaluated_count: usize,
    pub secure_count: usize,
}

/// Sequential multi-port scanner over a [`CertificateFetcher`].
pub struct Scanner<F> {
    fetcher: F,
    options: ScanOptions,
}

impl<F: CertificateFetcher> Scanner<F> {
    pub fn new(fetcher: F, options: ScanOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan every port of `host` and evaluate each leaf against `standards`.
    pub fn scan<S: AsRef<str>>(
        &self,
        host: &str,
        ports: &[S],
        standards: &StandardsConfig,
        ctx: &EvaluationContext,
    ) -> ScanReport {
        info!(
            host,
            ports = ports.len(),
            timeout = ?self.options.timeout,
            standard = standards.selected_name(),
            "Starting TLS scan"
        );

        let results: Vec<PortScanResult> = ports
            .iter()
            .map(|port| self.scan_port(host, port.as_ref(), standards, ctx))
            .collect();

        let evaluated_count = results.iter().filter(|r| r.evaluated).count();
        let secure_count = results.iter().filter(|r| r.secure).count();

        info!(
            host,
            ports_scanned = results.len(),
            evaluated_count,
            secure_count,
            "TLS scan complete"
        );

        ScanReport {
            host: host.to_string(),
            ports_scanned: results.len(),
            evaluated_count,
            secure_count,
            results,
        }
    }

    fn scan_port(
        &self,
        host: &str,
        port: &str,
        standards: &StandardsConfig,
        ctx: &EvaluationContext,
    ) -> PortScanResult {
        let chain = match self.fetcher.fetch_chain(host, port, self.options.timeout) {
            Ok(chain) => chain,
            Err(e) => {
                warn!(host, port, error = %e, "Connection failed");
                return PortScanResult::failed(port, STATUS_CONNECTION_FAILED, format!("Error: {e}"));
            }
        };

        let Some(leaf) = chain.first() else {
            warn!(host, port, "Peer presented no certificate");
            return PortScanResult::failed(
                port,
                STATUS_NO_CERTIFICATE,
                "Server did not present a certificate.".to_string(),
            );
        };

        let key = match parse::parse(leaf) {
            Ok(key) => key,
            Err(e) => {
                warn!(host, port, error = %e, "Leaf certificate could not be parsed");
                return PortScanResult::failed(
                    port,
                    STATUS_PARSING_FAILED,
                    format!("Cert parse error: {e}"),
                );
            }
        };

        let certificate = self.options.check_expiry.then_some(leaf.as_slice());
        let result = eval::evaluate(&key, standards, certificate, ctx);

        let detail = if self.options.check_expiry {
            let mut expiry = format!("Expires: {}", result.expiry.as_deref().unwrap_or("N/A"));
            if let Some(warning) = &result.expiry_warning {
                expiry.push_str(&format!(" ({warning})"));
            }
            expiry
        } else {
            "-".to_string()
        };

        PortScanResult {
            port: port.to_string(),
            status: result.status,
            algorithm: result.algorithm,
            length: result.length,
            detail,
            secure: result.secure,
            evaluated: true,
        }
    }
}

/// Strip a URL scheme and any path from `input`, leaving the host.
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Split a comma-separated port list, dropping blanks.
pub fn parse_port_list(input: &str) -> Result<Vec<String>, KeylengthError> {
    let ports: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if ports.is_empty() {
        return Err(KeylengthError::InvalidInput(
            "no valid ports specified".to_string(),
        ));
    }
    Ok(ports)
}

/// Parse a duration such as `5s`, `500ms`, `1m30s` or `2.5s`.
pub fn parse_timeout(input: &str) -> Result<Duration, KeylengthError> {
    let invalid = || KeylengthError::InvalidInput(format!("invalid timeout: {input:?}"));

    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (number, tail) = rest.split_at(number_end);
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let seconds = match unit {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            _ => return Err(invalid()),
        };

        total += Duration::try_from_secs_f64(seconds).map_err(|_| invalid())?;
        rest = tail;
    }
    Ok(total)
}
