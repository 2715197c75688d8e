//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use tariff_finder::catalog::{Catalog, Tariff};
use tariff_finder::engine::ConsumptionInput;

/// Parses a decimal literal; panics on typos in test data.
pub fn dec(s: &str) -> Decimal {
    s.parse()
        .unwrap_or_else(|e| panic!("bad decimal literal {s:?}: {e}"))
}

/// 30 days, 4.6 kW / 4.6 kW, 100 / 150 / 200 kWh, no current bill.
pub fn typical_input() -> ConsumptionInput {
    ConsumptionInput::new(
        30,
        dec("4.6"),
        dec("4.6"),
        [dec("100"), dec("150"), dec("200")],
    )
    .expect("typical input is valid")
}

/// Three-period tariff: 0.11 / 0.06 €/kW/day, 0.20 / 0.16 / 0.09 €/kWh.
///
/// Costs 110.14 € for [`typical_input`].
pub fn three_period_tariff(company: &str, name: &str) -> Tariff {
    Tariff::time_of_use(
        company,
        name,
        dec("0.11"),
        dec("0.06"),
        [dec("0.20"), dec("0.16"), dec("0.09")],
    )
}

/// Single-rate tariff with the same power prices as [`three_period_tariff`].
pub fn single_rate_tariff(company: &str, name: &str, energy_price: &str) -> Tariff {
    Tariff::single_rate(company, name, dec("0.11"), dec("0.06"), dec(energy_price))
}

/// Small mixed catalog; every tariff costs more than 55 € for [`typical_input`].
pub fn small_catalog() -> Catalog {
    Catalog::new(vec![
        three_period_tariff("Alpha", "Tres"),
        single_rate_tariff("Beta", "Fija", "0.15"),
        single_rate_tariff("Gamma", "Barata", "0.12"),
    ])
    .expect("small catalog is valid")
}

/// The catalog shipped with the crate.
pub fn builtin_catalog() -> Catalog {
    Catalog::builtin().expect("built-in catalog is valid")
}
