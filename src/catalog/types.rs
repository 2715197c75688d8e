//! Tariff record and its energy-period structure.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest price accepted for any power (€/kW/day) or energy (€/kWh) field.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// How many time-of-use periods a tariff bills energy in.
///
/// Authored as the integer `energy_period_count` (1 or 3); any other value
/// is rejected when the catalog is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EnergyPeriods {
    /// One flat rate applied to all consumption.
    Single,
    /// Separate peak, flat, and off-peak rates.
    Three,
}

impl EnergyPeriods {
    pub fn count(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for EnergyPeriods {
    type Error = String;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(Self::Single),
            3 => Ok(Self::Three),
            other => Err(format!("energy_period_count must be 1 or 3, got {other}")),
        }
    }
}

impl From<EnergyPeriods> for u8 {
    fn from(periods: EnergyPeriods) -> Self {
        periods.count()
    }
}

impl fmt::Display for EnergyPeriods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// One catalog entry: a provider's offer and its pricing coefficients.
///
/// Power prices are €/kW/day, energy prices €/kWh. Immutable once the
/// catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tariff {
    /// Provider name.
    pub company: String,
    /// Commercial name of the offer.
    pub name: String,
    /// Link to the provider's offer page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_url: Option<String>,
    /// Link to the provider's logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Contracted power price in P1 (punta), €/kW/day.
    pub power_price_peak: Decimal,
    /// Contracted power price in P2 (valle), €/kW/day.
    pub power_price_off_peak: Decimal,
    /// Whether energy is billed at one rate or three.
    #[serde(rename = "energy_period_count")]
    pub energy_periods: EnergyPeriods,
    /// Energy price in P1 (punta), €/kWh. The only rate of a single-period tariff.
    pub energy_price_peak: Decimal,
    /// Energy price in P2 (llano), €/kWh.
    pub energy_price_flat: Decimal,
    /// Energy price in P3 (valle), €/kWh.
    pub energy_price_off_peak: Decimal,
    /// Contractual lock-in (permanencia).
    #[serde(default)]
    pub has_commitment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    /// Regulated last-resort tariff (PVPC), priced net of its energy portion.
    #[serde(default)]
    pub is_reference_market_tariff: bool,
}

impl Tariff {
    /// Creates a tariff billing all energy at one rate.
    pub fn single_rate(
        company: impl Into<String>,
        name: impl Into<String>,
        power_price_peak: Decimal,
        power_price_off_peak: Decimal,
        energy_price: Decimal,
    ) -> Self {
        Self {
            company: company.into(),
            name: name.into(),
            offer_url: None,
            logo_url: None,
            power_price_peak,
            power_price_off_peak,
            energy_periods: EnergyPeriods::Single,
            energy_price_peak: energy_price,
            energy_price_flat: energy_price,
            energy_price_off_peak: energy_price,
            has_commitment: false,
            conditions: None,
            is_reference_market_tariff: false,
        }
    }

    /// Creates a tariff with peak, flat, and off-peak energy rates.
    pub fn time_of_use(
        company: impl Into<String>,
        name: impl Into<String>,
        power_price_peak: Decimal,
        power_price_off_peak: Decimal,
        energy_prices: [Decimal; 3],
    ) -> Self {
        let [peak, flat, off_peak] = energy_prices;
        Self {
            energy_periods: EnergyPeriods::Three,
            energy_price_peak: peak,
            energy_price_flat: flat,
            energy_price_off_peak: off_peak,
            ..Self::single_rate(company, name, power_price_peak, power_price_off_peak, peak)
        }
    }

    pub fn with_offer_url(mut self, url: impl Into<String>) -> Self {
        self.offer_url = Some(url.into());
        self
    }

    pub fn with_commitment(mut self) -> Self {
        self.has_commitment = true;
        self
    }

    /// Marks this tariff as the regulated reference-market tariff.
    pub fn reference_market(mut self) -> Self {
        self.is_reference_market_tariff = true;
        self
    }

    /// Checks a single record; `path` prefixes every reported field.
    pub fn validate(&self, path: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.company.trim().is_empty() {
            errors.push(ConfigError::new(
                format!("{path}.company"),
                "must not be empty",
            ));
        }
        if self.name.trim().is_empty() {
            errors.push(ConfigError::new(format!("{path}.name"), "must not be empty"));
        }

        let prices = [
            ("power_price_peak", self.power_price_peak),
            ("power_price_off_peak", self.power_price_off_peak),
            ("energy_price_peak", self.energy_price_peak),
            ("energy_price_flat", self.energy_price_flat),
            ("energy_price_off_peak", self.energy_price_off_peak),
        ];
        for (field, price) in prices {
            if price < Decimal::ZERO {
                errors.push(ConfigError::new(
                    format!("{path}.{field}"),
                    format!("must be >= 0, got {price}"),
                ));
            } else if price > MAX_PRICE {
                errors.push(ConfigError::new(
                    format!("{path}.{field}"),
                    format!("must be <= {MAX_PRICE}, got {price}"),
                ));
            }
        }

        if self.energy_periods == EnergyPeriods::Single
            && (self.energy_price_flat != self.energy_price_peak
                || self.energy_price_off_peak != self.energy_price_peak)
        {
            errors.push(ConfigError::new(
                format!("{path}.energy_price_flat"),
                "single-period tariff must carry the same price in all three energy fields",
            ));
        }

        errors
    }
}
