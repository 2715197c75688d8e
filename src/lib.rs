//! Household electricity tariff comparison.
//!
//! Estimates one billing period's cost under every tariff of an immutable
//! catalog, ranks them, and reports savings against the current bill.

#[cfg(feature = "api")]
pub mod api;
pub mod catalog;
/// Bill extraction and explanation collaborators, and the comparison service.
pub mod collaborators;
pub mod config;
/// Cost and ranking engine.
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
mod report;

pub use catalog::{Catalog, EnergyPeriods, Tariff};
pub use collaborators::{Comparison, ComparisonService};
pub use engine::{ConsumptionInput, TariffResult, compute_recommendations};
pub use error::Error;
