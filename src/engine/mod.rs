//! Cost & ranking engine.
//!
//! A pure function of a validated [`ConsumptionInput`] and a validated
//! [`Catalog`](crate::catalog::Catalog):
//! no I/O, no shared mutable state, safe to call from any number of threads.

/// Per-tariff bill computation and the regulated rates it uses.
pub mod cost;
/// Per-period consumption shares.
pub mod profile;
pub mod ranking;
pub mod types;

pub use cost::{round_currency, tariff_cost};
pub use profile::{ConsumptionProfile, Period, PeriodShare};
pub use ranking::{
    MAX_RECOMMENDATIONS, Policy, Recommendations, Recommender, compute_recommendations, rank_all,
};
pub use types::{
    ConsumptionInput, CostBreakdown, MAX_BILLED_DAYS, MAX_CONTRACTED_POWER_KW, MAX_ENERGY_KWH,
    TariffResult,
};
