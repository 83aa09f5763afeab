// SPDX-License-Identifier: PMPL-1.0-or-later
//! keylength-check — Key Length & Certificate Strength Checker
//!
//! Entry point for the keylength-check CLI. Dispatches to the appropriate
//! subcommand handler based on command-line arguments.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use keylength::cli::{Cli, Command, OutputFormat};
use keylength::eval::{self, EvaluationContext, EvaluationResult};
use keylength::keys::{self, Algorithm, KeyMaterial, SymmetricKey};
use keylength::parse;
use keylength::scan::{self, ScanOptions, ScanReport, Scanner};
use keylength::standards::{StandardsCatalog, StandardsConfig};
use keylength::tls::TlsCertificateFetcher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut ctx = EvaluationContext::current();
    if let Some(year) = cli.as_of_year {
        ctx = ctx.with_year(year);
    }

    let all_secure = match cli.command {
        Command::Scan {
            ref file,
            ref standard,
            check_expiry,
        } => cmd_scan(&cli, file, standard, check_expiry, &ctx)?,
        Command::Tls {
            ref host,
            ref standard,
            ref ports,
            check_expiry,
            ref timeout,
        } => cmd_tls(&cli, host, standard, ports, check_expiry, timeout, &ctx)?,
        Command::Standards => cmd_standards(&cli, &ctx)?,
        Command::Recommend { year } => cmd_recommend(year.unwrap_or(ctx.as_of_year), cli.format)?,
        Command::Symmetric { bits, ref standard } => cmd_symmetric(&cli, bits, standard, &ctx)?,
    };

    // Exit with error code if an insecure key was found
    if cli.fail_on_insecure && !all_secure {
        std::process::exit(1);
    }

    Ok(())
}

fn load_standards(cli: &Cli, standard: &str) -> Result<StandardsConfig> {
    StandardsConfig::load(&cli.standards, standard).with_context(|| {
        format!(
            "Failed to load standards from {}",
            cli.standards.display()
        )
    })
}

/// Evaluate one key or certificate file.
fn cmd_scan(
    cli: &Cli,
    file: &Path,
    standard: &str,
    check_expiry: bool,
    ctx: &EvaluationContext,
) -> Result<bool> {
    tracing::info!("Evaluating file: {}", file.display());

    let standards = load_standards(cli, standard)?;
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let key = parse::parse(&data)
        .with_context(|| format!("Failed to parse key material in {}", file.display()))?;

    let certificate = check_expiry.then_some(data.as_slice());
    let result = eval::evaluate(&key, &standards, certificate, ctx);

    match cli.format {
        OutputFormat::Text => {
            println!("File: {}", file.display());
            print_result(&result, check_expiry);
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
            println!("{}", json);
        }
    }

    Ok(result.secure)
}

/// Scan every requested port of a TLS host.
fn cmd_tls(
    cli: &Cli,
    host: &str,
    standard: &str,
    ports: &str,
    check_expiry: bool,
    timeout: &str,
    ctx: &EvaluationContext,
) -> Result<bool> {
    let host = scan::normalize_host(host);
    anyhow::ensure!(!host.is_empty(), "Host cannot be empty");

    let ports = scan::parse_port_list(ports)?;
    let timeout = scan::parse_timeout(timeout).unwrap_or_else(|e| {
        tracing::warn!("{}, using default {:?}", e, scan::DEFAULT_TIMEOUT);
        scan::DEFAULT_TIMEOUT
    });

    let standards = load_standards(cli, standard)?;
    let options = ScanOptions {
        timeout,
        check_expiry,
    };
    let scanner = Scanner::new(TlsCertificateFetcher::new(), options);
    let report = scanner.scan(&host, &ports, &standards, ctx);

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize scan report")?;
            println!("{}", json);
        }
    }

    Ok(report.secure_count == report.evaluated_count)
}

/// List the standards in the catalog.
fn cmd_standards(cli: &Cli, ctx: &EvaluationContext) -> Result<bool> {
    let catalog = StandardsCatalog::load(&cli.standards).with_context(|| {
        format!(
            "Failed to load standards from {}",
            cli.standards.display()
        )
    })?;

    match cli.format {
        OutputFormat::Text => {
            println!("Available standards ({}):\n", catalog.len());
            println!(
                "  {:<10} {:>6} {:>6} {:>10} {:>8}",
                "Name", "RSA", "ECC", "Symmetric", "Cutoff"
            );
            for (name, standard) in catalog.iter() {
                let cutoff = standard
                    .cut_off_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<10} {:>6} {:>6} {:>10} {:>8}",
                    name,
                    standard.threshold(Algorithm::Rsa.as_str(), ctx.as_of_year),
                    standard.ecc,
                    standard.symmetric,
                    cutoff,
                );
            }
        }
        OutputFormat::Json => {
            let standards: BTreeMap<_, _> = catalog.iter().collect();
            let json = serde_json::to_string_pretty(&standards)
                .context("Failed to serialize standards")?;
            println!("{}", json);
        }
    }

    Ok(true)
}

/// Recommended minimum lengths for `year`.
fn cmd_recommend(year: i32, format: OutputFormat) -> Result<bool> {
    let recommendations: BTreeMap<&str, u32> = Algorithm::ALL
        .iter()
        .map(|&alg| (alg.as_str(), keys::recommended_length(alg, year)))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Recommended minimum key lengths for {}:\n", year);
            for alg in Algorithm::ALL {
                println!(
                    "  {:<10} {} bits",
                    alg.as_str(),
                    keys::recommended_length(alg, year)
                );
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "year": year,
                "recommendations": recommendations,
            }))
            .context("Failed to serialize recommendations")?;
            println!("{}", json);
        }
    }

    Ok(true)
}

/// Evaluate a bare symmetric key length.
fn cmd_symmetric(cli: &Cli, bits: u32, standard: &str, ctx: &EvaluationContext) -> Result<bool> {
    let standards = load_standards(cli, standard)?;
    let key = KeyMaterial::from(SymmetricKey::new(bits));
    let result = eval::evaluate(&key, &standards, None, ctx);

    match cli.format {
        OutputFormat::Text => print_result(&result, false),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
            println!("{}", json);
        }
    }

    Ok(result.secure)
}

fn print_result(result: &EvaluationResult, check_expiry: bool) {
    println!("Algorithm:  {}", result.algorithm);
    println!("Key Length: {} bits", result.length);
    println!(
        "Threshold:  {} bits ({})",
        result.threshold, result.standard
    );
    println!("Status:     {}", result.status);
    if check_expiry {
        println!(
            "Expires:    {}",
            result.expiry.as_deref().unwrap_or("N/A")
        );
        if let Some(ref warning) = result.expiry_warning {
            println!("  {}", warning);
        }
    }
}

fn print_report(report: &ScanReport) {
    println!("TLS scan of {}\n", report.host);
    println!(
        "  {:<7} {:<22} {:<10} {:>6}  {}",
        "Port", "Status", "Algorithm", "Bits", "Detail"
    );
    for row in &report.results {
        let algorithm = if row.algorithm.is_empty() {
            "-"
        } else {
            row.algorithm.as_str()
        };
        let length = if row.evaluated {
            row.length.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "  {:<7} {:<22} {:<10} {:>6}  {}",
            row.port, row.status, algorithm, length, row.detail
        );
    }
    println!();
    println!(
        "Scanned {} port(s): {} evaluated, {} secure, {} insecure",
        report.ports_scanned,
        report.evaluated_count,
        report.secure_count,
        report.evaluated_count - report.secure_count,
    );
}
