//! Error taxonomy: rejected input, malformed catalog, failing collaborators.

use std::fmt;
use std::io;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"consumption.billed_days"` or `"tariff[2].name"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

/// A consumption record that cannot be priced.
///
/// Raised before the engine runs; the engine never repairs input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: Decimal },
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: Decimal },
    #[error("{field} must be <= {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
    #[error("{field} is missing")]
    Missing { field: &'static str },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::TooLarge { field, .. }
            | Self::Missing { field } => *field,
        }
    }

    /// The violated constraint without the field name.
    pub fn constraint(&self) -> String {
        match self {
            Self::NotPositive { value, .. } => format!("must be > 0, got {value}"),
            Self::Negative { value, .. } => format!("must be >= 0, got {value}"),
            Self::TooLarge { value, max, .. } => format!("must be <= {max}, got {value}"),
            Self::Missing { .. } => "is missing".to_string(),
        }
    }
}

/// A tariff catalog that failed to load.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog contains no tariffs")]
    Empty,
    #[error("{}", join_config_errors(.0))]
    Invalid(Vec<ConfigError>),
}

impl CatalogError {
    /// Field-level problems, if this is a validation failure.
    pub fn config_errors(&self) -> &[ConfigError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Failure reported by an external service around the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("bill extraction failed: {0}")]
    Extraction(String),
    #[error("explanation failed: {0}")]
    Explanation(String),
}

/// Any failure of a comparison request.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
