// SPDX-License-Identifier: PMPL-1.0-or-later
//! Standards Catalog — named minimum key lengths loaded from JSON.
//!
//! File shape:
//!
//! ```json
//! { "standards": { "NIST": { "RSA": 2048, "ECC": 256, "Symmetric": 128, "cut_off_year": 2030 } } }
//! ```
//!
//! The catalog is loaded once and is read-only afterwards. A [`StandardsConfig`]
//! pairs it with the selected standard name, which must exist in the table.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Standard used when the caller does not name one.
pub const DEFAULT_STANDARD: &str = "NIST";

/// RSA threshold applied once a standard's cutoff year has passed.
pub const RSA_POST_CUTOFF_THRESHOLD: u32 = 3072;

/// Minimum key lengths, in bits, for one named standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    #[serde(rename = "RSA")]
    pub rsa: u32,
    #[serde(rename = "ECC")]
    pub ecc: u32,
    #[serde(rename = "Symmetric")]
    pub symmetric: u32,
    /// Last year the configured RSA threshold is trusted. `None` disables the override.
    #[serde(rename = "cut_off_year", default, skip_serializing_if = "Option::is_none")]
    pub cut_off_year: Option<i32>,
}

impl Standard {
    /// Whether `as_of_year` lies beyond this standard's cutoff.
    pub fn is_past_cutoff(&self, as_of_year: i32) -> bool {
        self.cut_off_year.is_some_and(|cutoff| as_of_year > cutoff)
    }

    /// Minimum bits for `algorithm` ("RSA", "ECC", "Symmetric") in `as_of_year`.
    ///
    /// Unknown algorithm tags yield 0. Only RSA is affected by the cutoff.
    pub fn threshold(&self, algorithm: &str, as_of_year: i32) -> u32 {
        match algorithm {
            "RSA" if self.is_past_cutoff(as_of_year) => RSA_POST_CUTOFF_THRESHOLD,
            "RSA" => self.rsa,
            "ECC" => self.ecc,
            "Symmetric" => self.symmetric,
            _ => 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StandardsFile {
    standards: BTreeMap<String, Standard>,
}

/// All named standards from one configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardsCatalog {
    standards: BTreeMap<String, Standard>,
}

impl StandardsCatalog {
    /// Read and decode a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptySourcePath);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            standards = catalog.len(),
            "Loaded standards catalog"
        );
        Ok(catalog)
    }

    /// Decode a catalog from JSON text.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: StandardsFile = serde_json::from_str(content)?;
        Ok(Self {
            standards: file.standards,
        })
    }

    /// Build a catalog from already-decoded standards.
    pub fn from_standards<I, S>(standards: I) -> Self
    where
        I: IntoIterator<Item = (S, Standard)>,
        S: Into<String>,
    {
        Self {
            standards: standards
                .into_iter()
                .map(|(name, standard)| (name.into(), standard))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Standard> {
        self.standards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.standards.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    /// Names of every standard in the catalog, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.standards.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Standard)> {
        self.standards.iter().map(|(name, std)| (name.as_str(), std))
    }
}

/// A loaded catalog together with the standard chosen for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardsConfig {
    catalog: StandardsCatalog,
    selected: String,
}

impl StandardsConfig {
    /// Load `path` and select `selected` (empty selects [`DEFAULT_STANDARD`]).
    pub fn load(path: impl AsRef<Path>, selected: &str) -> Result<Self, ConfigError> {
        let catalog = StandardsCatalog::load(path.as_ref())?;
        Self::from_catalog(catalog, selected)
    }

    /// Select a standard from an existing catalog.
    pub fn from_catalog(catalog: StandardsCatalog, selected: &str) -> Result<Self, ConfigError> {
        let selected = if selected.is_empty() {
            DEFAULT_STANDARD
        } else {
            selected
        };

        if !catalog.contains(selected) {
            return Err(ConfigError::UnknownStandard(selected.to_string()));
        }

        debug!(standard = selected, "Selected security standard");
        Ok(Self {
            catalog,
            selected: selected.to_string(),
        })
    }

    pub fn selected_name(&self) -> &str {
        &self.selected
    }

    pub fn selected(&self) -> &Standard {
        // Presence is checked in `from_catalog` and the catalog is never mutated.
        &self.catalog.standards[&self.selected]
    }

    pub fn catalog(&self) -> &StandardsCatalog {
        &self.catalog
    }

    /// Threshold of the selected standard for `algorithm` in `as_of_year`.
    pub fn threshold(&self, algorithm: &str, as_of_year: i32) -> u32 {
        self.selected().threshold(algorithm, as_of_year)
    }

    pub fn available_standards(&self) -> Vec<&str> {
        self.catalog.names()
    }
}
