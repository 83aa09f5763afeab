// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for evaluation — catalog loading, verdicts and expiry.

use chrono::Duration;
use keylength::eval::{certificate_not_after, evaluate, EvaluationContext};
use keylength::parse::parse;
use keylength::standards::{StandardsCatalog, StandardsConfig};
use keylength::{ConfigError, KeyMaterial};
use std::io::Write;
use std::path::Path;

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(Path::new("tests/fixtures").join(name))
        .unwrap_or_else(|e| panic!("Should read fixture {name}: {e}"))
}

fn single_standard(rsa: u32) -> StandardsConfig {
    let json = format!(
        r#"{{ "standards": {{ "TEST": {{ "RSA": {rsa}, "ECC": 256, "Symmetric": 128 }} }} }}"#
    );
    let catalog = StandardsCatalog::from_json(&json).unwrap();
    StandardsConfig::from_catalog(catalog, "TEST").unwrap()
}

fn ctx_2026() -> EvaluationContext {
    EvaluationContext::current().with_year(2026)
}

#[test]
fn test_rsa_2048_round_trip() {
    let key = parse(&fixture("rsa2048.pem")).unwrap();

    let result = evaluate(&key, &single_standard(2048), None, &ctx_2026());
    assert!(result.status.contains("Secure"));
    assert!(!result.status.contains("Insecure"));
    assert!(result.secure);
    assert_eq!(result.algorithm, "RSA");
    assert_eq!(result.length, 2048);

    let result = evaluate(&key, &single_standard(3072), None, &ctx_2026());
    assert!(result.status.contains("Insecure"));
    assert!(!result.secure);
    assert_eq!(result.threshold, 3072);
}

#[test]
fn test_bundled_catalog() {
    let standards = StandardsConfig::load("data/standards.json", "").unwrap();
    assert_eq!(standards.selected_name(), "NIST");
    assert_eq!(
        standards.available_standards(),
        vec!["ANSSI", "BSI", "ECRYPT", "NIST"]
    );

    let key = parse(&fixture("rsa2048.pem")).unwrap();
    let result = evaluate(&key, &standards, None, &ctx_2026());
    assert_eq!(result.status, "Secure (NIST)");

    // Past NIST's cutoff the RSA minimum rises to 3072.
    let result = evaluate(&key, &standards, None, &ctx_2026().with_year(2031));
    assert_eq!(result.status, "Insecure (NIST)");
    assert_eq!(result.threshold, 3072);

    // ECC is untouched by the cutoff.
    let ec = parse(&fixture("ec256.pem")).unwrap();
    let result = evaluate(&ec, &standards, None, &ctx_2026().with_year(2031));
    assert_eq!(result.status, "Secure (NIST)");
}

#[test]
fn test_bsi_is_past_cutoff() {
    let standards = StandardsConfig::load("data/standards.json", "BSI").unwrap();
    let key = parse(&fixture("rsa3072.pem")).unwrap();
    let result = evaluate(&key, &standards, None, &ctx_2026());
    assert_eq!(result.threshold, 3072);
    assert_eq!(result.status, "Secure (BSI)");
}

#[test]
fn test_unknown_algorithm_threshold_is_zero() {
    let standards = StandardsConfig::load("data/standards.json", "ECRYPT").unwrap();
    assert_eq!(standards.threshold("Unknown", 2026), 0);
    assert_eq!(standards.threshold("", 2100), 0);
}

#[test]
fn test_load_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "standards": {{
            "NIST": {{ "RSA": 2048, "ECC": 256, "Symmetric": 128, "cut_off_year": 2030 }},
            "LOCAL": {{ "RSA": 4096, "ECC": 384, "Symmetric": 256 }}
        }} }}"#
    )
    .unwrap();

    let standards = StandardsConfig::load(file.path(), "").unwrap();
    assert_eq!(standards.selected_name(), "NIST");

    let standards = StandardsConfig::load(file.path(), "LOCAL").unwrap();
    assert_eq!(standards.selected().cut_off_year, None);
    assert_eq!(standards.threshold("RSA", 2100), 4096);
}

#[test]
fn test_load_errors() {
    assert!(matches!(
        StandardsConfig::load("", "NIST"),
        Err(ConfigError::EmptySourcePath)
    ));
    assert!(matches!(
        StandardsConfig::load("tests/fixtures/missing.json", "NIST"),
        Err(ConfigError::Unreadable { .. })
    ));
    assert!(matches!(
        StandardsConfig::load("data/standards.json", "FIPS"),
        Err(ConfigError::UnknownStandard(ref name)) if name == "FIPS"
    ));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"standards\": ").unwrap();
    assert!(matches!(
        StandardsConfig::load(file.path(), ""),
        Err(ConfigError::Malformed(_))
    ));
}

#[test]
fn test_expiry_warning_thresholds() {
    let data = fixture("ec256_30d.pem");
    let key = parse(&data).unwrap();
    let not_after = certificate_not_after(&data).expect("fixture has a NotAfter");
    let standards = StandardsConfig::load("data/standards.json", "").unwrap();

    let soon = EvaluationContext::at(not_after - Duration::days(30)).with_year(2026);
    let result = evaluate(&key, &standards, Some(&data), &soon);
    assert_eq!(result.expiry, Some(not_after.format("%Y-%m-%d").to_string()));
    let warning = result.expiry_warning.expect("30 days left should warn");
    assert!(warning.contains("30 days"));

    let later = EvaluationContext::at(not_after - Duration::days(200)).with_year(2026);
    let result = evaluate(&key, &standards, Some(&data), &later);
    assert!(result.expiry.is_some());
    assert_eq!(result.expiry_warning, None);
}

#[test]
fn test_expiry_from_der_certificate() {
    let pem = fixture("rsa2048.pem");
    let der = fixture("rsa2048.der");
    assert!(certificate_not_after(&der).is_some());
    assert_eq!(certificate_not_after(&pem), certificate_not_after(&der));

    // Key envelopes carry no validity period.
    assert_eq!(certificate_not_after(&fixture("rsa2048_priv.pem")), None);
}

#[test]
fn test_result_serializes_without_empty_expiry() {
    let key: KeyMaterial = parse(&fixture("ec384.pem")).unwrap();
    let standards = StandardsConfig::load("data/standards.json", "").unwrap();
    let result = evaluate(&key, &standards, None, &ctx_2026());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["algorithm"], "ECC");
    assert_eq!(json["length"], 384);
    assert_eq!(json["secure"], true);
    assert!(json.get("expiry").is_none());
    assert!(json.get("expiry_warning").is_none());
}
