// SPDX-License-Identifier: PMPL-1.0-or-later
//! CLI Interface — clap-based command-line argument parsing for keylength-check.
//!
//! Subcommands:
//! - `scan <file>` — Evaluate a key or certificate file
//! - `tls <host>` — Evaluate the certificates served on one or more ports
//! - `standards` — List the loaded standards and their thresholds
//! - `recommend` — Recommended key lengths for a year
//! - `symmetric <bits>` — Evaluate a symmetric key length

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the standards catalog.
pub const DEFAULT_STANDARDS_PATH: &str = "data/standards.json";

/// keylength-check — Key Length & Certificate Strength Checker
///
/// Checks RSA and ECC keys, certificates and live TLS endpoints against
/// published key-length standards.
#[derive(Parser, Debug)]
#[command(name = "keylength-check")]
#[command(version)]
#[command(about = "Key Length & Certificate Strength Checker")]
#[command(long_about = "keylength-check measures the effective length of RSA, ECC and symmetric \
    keys and judges them against NIST, BSI, ANSSI or ECRYPT style minimums, either from files \
    or from the certificates presented by TLS endpoints.")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format (text, json).
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Path to the standards catalog (JSON).
    #[arg(
        long,
        env = "KEYLENGTH_STANDARDS",
        default_value = DEFAULT_STANDARDS_PATH,
        global = true
    )]
    pub standards: PathBuf,

    /// Year used for cutoff and recommendation logic (default: current year).
    #[arg(long, global = true)]
    pub as_of_year: Option<i32>,

    /// Exit with status 1 when any evaluated key is insecure.
    #[arg(long, global = true)]
    pub fail_on_insecure: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for programmatic consumption.
    Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a PEM or DER key/certificate file.
    Scan {
        /// File to evaluate.
        file: PathBuf,

        /// Standard to evaluate against (default: NIST).
        #[arg(short, long, default_value = "")]
        standard: String,

        /// Report certificate expiry.
        #[arg(short = 'e', long)]
        check_expiry: bool,
    },

    /// Evaluate the certificates served by a TLS endpoint.
    Tls {
        /// Host name or address; a URL scheme and path are ignored.
        host: String,

        /// Standard to evaluate against (default: NIST).
        #[arg(short, long, default_value = "")]
        standard: String,

        /// Comma-separated ports to scan.
        #[arg(short, long, default_value = "443")]
        ports: String,

        /// Report certificate expiry.
        #[arg(short = 'e', long)]
        check_expiry: bool,

        /// Per-connection timeout (e.g. 5s, 500ms, 1m).
        #[arg(short, long, default_value = "5s")]
        timeout: String,
    },

    /// List the standards in the catalog.
    Standards,

    /// Show recommended key lengths for a year.
    Recommend {
        /// Year to recommend for (default: --as-of-year or the current year).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Evaluate a symmetric key length in bits.
    Symmetric {
        /// Key length in bits.
        bits: u32,

        /// Standard to evaluate against (default: NIST).
        #[arg(short, long, default_value = "")]
        standard: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tls_defaults() {
        let cli = Cli::try_parse_from(["keylength-check", "tls", "https://example.com/"]).unwrap();
        match cli.command {
            Command::Tls {
                host,
                standard,
                ports,
                check_expiry,
                timeout,
            } => {
                assert_eq!(host, "https://example.com/");
                assert_eq!(standard, "");
                assert_eq!(ports, "443");
                assert!(!check_expiry);
                assert_eq!(timeout, "5s");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.fail_on_insecure);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "keylength-check",
            "scan",
            "cert.pem",
            "-s",
            "BSI",
            "-e",
            "-f",
            "json",
            "--as-of-year",
            "2035",
            "--standards",
            "/tmp/s.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.as_of_year, Some(2035));
        assert_eq!(cli.standards, PathBuf::from("/tmp/s.json"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Scan { ref standard, check_expiry: true, .. } if standard == "BSI"
        ));
    }
}
