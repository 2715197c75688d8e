//! Immutable tariff catalog, loaded once and passed explicitly to the engine.

pub mod types;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, ConfigError};

pub use types::{EnergyPeriods, MAX_PRICE, Tariff};

/// Catalog compiled into the binary.
const BUILTIN_TOML: &str = include_str!("builtin.toml");

/// On-disk layout: an array of `[[tariff]]` tables.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "tariff")]
    tariffs: Vec<Tariff>,
}

/// A validated, read-only sequence of tariffs.
///
/// The base order is the authoring order. It is stable but carries no
/// meaning; ranking is the engine's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tariffs: Vec<Tariff>,
}

impl Catalog {
    /// Validates and freezes a list of tariffs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::Invalid` listing every malformed field otherwise.
    pub fn new(tariffs: Vec<Tariff>) -> Result<Self, CatalogError> {
        if tariffs.is_empty() {
            return Err(CatalogError::Empty);
        }
        let errors = validate(&tariffs);
        if !errors.is_empty() {
            return Err(CatalogError::Invalid(errors));
        }
        tracing::debug!(tariffs = tariffs.len(), "catalog loaded");
        Ok(Self { tariffs })
    }

    /// Returns the catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded data itself is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Parses a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read, does not parse,
    /// or contains an invalid tariff.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the TOML is invalid, has unknown fields,
    /// or contains an invalid tariff.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(s)?;
        Self::new(file.tariffs)
    }

    pub fn tariffs(&self) -> &[Tariff] {
        &self.tariffs
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tariff> {
        self.tariffs.iter()
    }

    /// Looks up a tariff by provider and offer name.
    pub fn find(&self, company: &str, name: &str) -> Option<&Tariff> {
        self.tariffs
            .iter()
            .find(|t| t.company == company && t.name == name)
    }

    /// The regulated last-resort tariff, if the catalog carries one.
    pub fn reference_market_tariff(&self) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.is_reference_market_tariff)
    }
}

impl AsRef<[Tariff]> for Catalog {
    fn as_ref(&self) -> &[Tariff] {
        &self.tariffs
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Tariff;
    type IntoIter = std::slice::Iter<'a, Tariff>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-record checks plus catalog-wide uniqueness rules.
fn validate(tariffs: &[Tariff]) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reference_index: Option<usize> = None;

    for (i, tariff) in tariffs.iter().enumerate() {
        let path = format!("tariff[{i}]");
        errors.extend(tariff.validate(&path));

        if !seen.insert((tariff.company.as_str(), tariff.name.as_str())) {
            errors.push(ConfigError::new(
                format!("{path}.name"),
                format!(
                    "duplicate tariff \"{}\" from \"{}\"",
                    tariff.name, tariff.company
                ),
            ));
        }

        if tariff.is_reference_market_tariff {
            if let Some(first) = reference_index {
                errors.push(ConfigError::new(
                    format!("{path}.is_reference_market_tariff"),
                    format!("only one reference-market tariff allowed, already set on tariff[{first}]"),
                ));
            } else {
                reference_index = Some(i);
            }
        }
    }

    errors
}
