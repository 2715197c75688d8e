//! Engine inputs and outputs: consumption record, cost breakdown, ranked result.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Tariff;
use crate::error::ValidationError;

use super::cost::round_currency;

/// Longest billing period accepted (days).
pub const MAX_BILLED_DAYS: u32 = 366;

/// Largest contracted power accepted per period (kW).
pub const MAX_CONTRACTED_POWER_KW: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Largest metered energy accepted per period (kWh).
pub const MAX_ENERGY_KWH: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// One billing period of a household: days, contracted power, metered energy.
///
/// Power is in kW for P1 (punta) and P2 (valle); energy in kWh for P1
/// (punta), P2 (llano) and P3 (valle). Validate with
/// [`ConsumptionInput::validate`] before handing it to the engine.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use tariff_finder::engine::ConsumptionInput;
///
/// let input = ConsumptionInput::new(
///     30,
///     Decimal::new(46, 1),
///     Decimal::new(46, 1),
///     [Decimal::from(100), Decimal::from(150), Decimal::from(200)],
/// )
/// .unwrap();
/// assert_eq!(input.total_energy(), Decimal::from(450));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumptionInput {
    /// Length of the billing period (days, 1..=366).
    pub billed_days: u32,
    /// Contracted power in P1 (kW, > 0).
    pub contracted_power_peak: Decimal,
    /// Contracted power in P2 (kW, > 0).
    pub contracted_power_off_peak: Decimal,
    /// Energy metered in P1 (kWh, >= 0).
    pub energy_peak: Decimal,
    /// Energy metered in P2 (kWh, >= 0).
    pub energy_flat: Decimal,
    /// Energy metered in P3 (kWh, >= 0).
    pub energy_off_peak: Decimal,
    /// The user's last actual bill (€, > 0). Only used for savings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bill_amount: Option<Decimal>,
}

impl ConsumptionInput {
    /// Builds and validates an input without a current bill.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn new(
        billed_days: u32,
        contracted_power_peak: Decimal,
        contracted_power_off_peak: Decimal,
        energy: [Decimal; 3],
    ) -> Result<Self, ValidationError> {
        let [energy_peak, energy_flat, energy_off_peak] = energy;
        let input = Self {
            billed_days,
            contracted_power_peak,
            contracted_power_off_peak,
            energy_peak,
            energy_flat,
            energy_off_peak,
            current_bill_amount: None,
        };
        input.validate()?;
        Ok(input)
    }

    /// Attaches the user's current bill for savings comparison.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotPositive` if `amount <= 0`.
    pub fn with_current_bill(mut self, amount: Decimal) -> Result<Self, ValidationError> {
        self.current_bill_amount = Some(amount);
        self.validate()?;
        Ok(self)
    }

    /// Total metered energy across the three periods (kWh).
    pub fn total_energy(&self) -> Decimal {
        self.energy_peak + self.energy_flat + self.energy_off_peak
    }

    /// Returns the first violated constraint, if any.
    ///
    /// # Errors
    ///
    /// See [`ConsumptionInput::violations`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.violations().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Lists every violated constraint in field order.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.billed_days == 0 {
            errors.push(ValidationError::NotPositive {
                field: "billed_days",
                value: Decimal::ZERO,
            });
        } else if self.billed_days > MAX_BILLED_DAYS {
            errors.push(ValidationError::TooLarge {
                field: "billed_days",
                value: Decimal::from(self.billed_days),
                max: Decimal::from(MAX_BILLED_DAYS),
            });
        }

        let powers = [
            ("contracted_power_peak", self.contracted_power_peak),
            ("contracted_power_off_peak", self.contracted_power_off_peak),
        ];
        for (field, value) in powers {
            if value <= Decimal::ZERO {
                errors.push(ValidationError::NotPositive { field, value });
            } else if value > MAX_CONTRACTED_POWER_KW {
                errors.push(ValidationError::TooLarge {
                    field,
                    value,
                    max: MAX_CONTRACTED_POWER_KW,
                });
            }
        }

        let energies = [
            ("energy_peak", self.energy_peak),
            ("energy_flat", self.energy_flat),
            ("energy_off_peak", self.energy_off_peak),
        ];
        for (field, value) in energies {
            if value < Decimal::ZERO {
                errors.push(ValidationError::Negative { field, value });
            } else if value > MAX_ENERGY_KWH {
                errors.push(ValidationError::TooLarge {
                    field,
                    value,
                    max: MAX_ENERGY_KWH,
                });
            }
        }

        if let Some(value) = self.current_bill_amount {
            if value <= Decimal::ZERO {
                errors.push(ValidationError::NotPositive {
                    field: "current_bill_amount",
                    value,
                });
            }
        }

        errors
    }
}

/// Every intermediate term of one tariff's bill.
///
/// Terms are kept at full precision; only `total` and `estimated_cost` are
/// rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    /// Contracted power × power price × days.
    pub power_term: Decimal,
    /// Energy × energy price, folded for single-period tariffs.
    pub energy_term: Decimal,
    /// `power_term + energy_term`.
    pub subtotal: Decimal,
    /// Electricity tax on the subtotal.
    pub electricity_tax: Decimal,
    /// Regulated meter rental for the billed days.
    pub meter_rental: Decimal,
    /// Social-bonus financing for the billed days.
    pub social_bonus: Decimal,
    /// Base for VAT.
    pub pre_tax_total: Decimal,
    pub vat: Decimal,
    /// Full bill, rounded half-up to cents.
    pub total: Decimal,
    /// Energy term with electricity tax and VAT; set for the reference-market tariff only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_with_taxes: Option<Decimal>,
    /// Published cost used for ranking.
    pub estimated_cost: Decimal,
}

/// One tariff priced against one consumption input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffResult<'a> {
    /// The catalog entry this result was computed from.
    pub tariff: &'a Tariff,
    /// Published bill estimate (€, 2 dp).
    pub estimated_cost: Decimal,
    pub breakdown: CostBreakdown,
    /// `current_bill - estimated_cost`; negative means the tariff costs more.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<Decimal>,
}

impl fmt::Display for TariffResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:<30} {:>9.2} €",
            self.tariff.company, self.tariff.name, self.estimated_cost
        )?;
        if let Some(savings) = self.savings {
            write!(f, "  (saves {:.2} €)", round_currency(savings))?;
        }
        Ok(())
    }
}
