// SPDX-License-Identifier: PMPL-1.0-or-later
//! Evaluation Engine — judges a parsed key against the selected standard.
//!
//! Produces one [`EvaluationResult`] per call. When certificate bytes are
//! supplied the result also carries the certificate's expiry date and, if
//! fewer than [`EXPIRY_WARNING_DAYS`] remain, a warning. Expiry inspection
//! never fails the evaluation.

use crate::keys::{KeyLengthEvaluator, KeyMaterial};
use crate::parse::{decode_certificate, decode_pem, PEM_CERTIFICATE};
use crate::standards::StandardsConfig;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// Remaining validity below which an expiry warning is attached.
pub const EXPIRY_WARNING_DAYS: i64 = 90;

/// Clock and year used for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Instant expiry is measured from.
    pub now: DateTime<Utc>,
    /// Year used for cutoff and recommendation logic.
    pub as_of_year: i32,
}

impl EvaluationContext {
    /// Context for the current instant.
    pub fn current() -> Self {
        Self::at(Utc::now())
    }

    /// Context for a fixed instant, with the year taken from it.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            as_of_year: now.year(),
        }
    }

    /// Override the as-of year, keeping the clock.
    pub fn with_year(mut self, year: i32) -> Self {
        self.as_of_year = year;
        self
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::current()
    }
}

/// Verdict for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub algorithm: String,
    pub length: u32,
    /// `"Secure (<standard>)"` or `"Insecure (<standard>)"`.
    pub status: String,
    pub secure: bool,
    pub threshold: u32,
    pub standard: String,
    /// Certificate NotAfter as `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_warning: Option<String>,
}

/// Evaluate `key` against the selected standard.
///
/// `certificate` may be PEM or DER; it is only inspected for expiry.
pub fn evaluate(
    key: &KeyMaterial,
    standards: &StandardsConfig,
    certificate: Option<&[u8]>,
    ctx: &EvaluationContext,
) -> EvaluationResult {
    let algorithm = key.algorithm();
    let length = key.length();
    let threshold = standards.threshold(algorithm.as_str(), ctx.as_of_year);
    let secure = key.is_secure(threshold);
    let standard = standards.selected_name().to_string();

    debug!(
        algorithm = %algorithm,
        length,
        threshold,
        secure,
        standard = %standard,
        "Evaluated key"
    );

    let mut result = EvaluationResult {
        algorithm: algorithm.to_string(),
        length,
        status: format!("{} ({})", if secure { "Secure" } else { "Insecure" }, standard),
        secure,
        threshold,
        standard,
        expiry: None,
        expiry_warning: None,
    };

    if let Some(not_after) = certificate.and_then(certificate_not_after) {
        result.expiry = Some(not_after.format("%Y-%m-%d").to_string());
        result.expiry_warning = expiry_warning(not_after, ctx.now);
    }

    result
}

/// NotAfter of a PEM or DER certificate, `None` if it cannot be decoded.
pub fn certificate_not_after(data: &[u8]) -> Option<DateTime<Utc>> {
    let pem = decode_pem(data);
    let der = match &pem {
        Some(pem) if pem.label == PEM_CERTIFICATE => pem.contents.as_slice(),
        Some(_) => return None,
        None => data,
    };

    match decode_certificate(der) {
        Ok(cert) => DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0),
        Err(e) => {
            debug!(error = %e, "Skipping expiry check");
            None
        }
    }
}

/// Warning text when `not_after` is closer than the warning window.
pub fn expiry_warning(not_after: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let remaining = not_after - now;
    if remaining >= Duration::days(EXPIRY_WARNING_DAYS) {
        return None;
    }

    let days = remaining.num_days();
    Some(if remaining < Duration::zero() {
        format!(
            "Warning: Certificate expired {} days ago (threshold: {} days)",
            -days, EXPIRY_WARNING_DAYS
        )
    } else {
        format!(
            "Warning: Certificate expires in {} days (threshold: {} days)",
            days, EXPIRY_WARNING_DAYS
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SymmetricKey;
    use crate::standards::{Standard, StandardsCatalog};
    use chrono::TimeZone;

    fn standards(name: &str) -> StandardsConfig {
        let catalog = StandardsCatalog::from_standards([
            (
                "NIST",
                Standard {
                    rsa: 2048,
                    ecc: 256,
                    symmetric: 128,
                    cut_off_year: Some(2030),
                },
            ),
            (
                "STRICT",
                Standard {
                    rsa: 4096,
                    ecc: 384,
                    symmetric: 256,
                    cut_off_year: None,
                },
            ),
        ]);
        StandardsConfig::from_catalog(catalog, name).unwrap()
    }

    fn ctx() -> EvaluationContext {
        EvaluationContext::at(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_symmetric_secure() {
        let key = KeyMaterial::from(SymmetricKey::new(128));
        let result = evaluate(&key, &standards("NIST"), None, &ctx());
        assert_eq!(result.algorithm, "Symmetric");
        assert_eq!(result.length, 128);
        assert_eq!(result.threshold, 128);
        assert!(result.secure);
        assert_eq!(result.status, "Secure (NIST)");
        assert_eq!(result.expiry, None);
        assert_eq!(result.expiry_warning, None);
    }

    #[test]
    fn test_symmetric_insecure() {
        let key = KeyMaterial::from(SymmetricKey::new(128));
        let result = evaluate(&key, &standards("STRICT"), None, &ctx());
        assert!(!result.secure);
        assert_eq!(result.status, "Insecure (STRICT)");
    }

    #[test]
    fn test_undecodable_certificate_leaves_expiry_empty() {
        let key = KeyMaterial::from(SymmetricKey::new(256));
        let result = evaluate(&key, &standards("NIST"), Some(b"not a certificate"), &ctx());
        assert!(result.secure);
        assert_eq!(result.expiry, None);
        assert_eq!(result.expiry_warning, None);
    }

    #[test]
    fn test_expiry_warning_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let soon = expiry_warning(now + Duration::days(30), now).unwrap();
        assert!(soon.contains("30 days"));
        assert!(soon.contains("threshold: 90 days"));

        assert!(expiry_warning(now + Duration::days(89), now).is_some());
        assert_eq!(expiry_warning(now + Duration::days(90), now), None);
        assert_eq!(expiry_warning(now + Duration::days(200), now), None);

        let expired = expiry_warning(now - Duration::days(3), now).unwrap();
        assert!(expired.contains("expired 3 days ago"));
    }

    #[test]
    fn test_context_year_override() {
        let ctx = ctx().with_year(2040);
        assert_eq!(ctx.as_of_year, 2040);
        assert_eq!(ctx.now.year(), 2026);
    }
}
