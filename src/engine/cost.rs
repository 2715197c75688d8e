//! Bill estimation for one tariff: power and energy terms, regulated charges, taxes.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::{EnergyPeriods, Tariff};

use super::types::{ConsumptionInput, CostBreakdown};

/// Electricity tax (Impuesto Especial sobre la Electricidad) on the power and
/// energy subtotal: 5.113 %.
pub const ELECTRICITY_TAX_RATE: Decimal = Decimal::from_parts(5113, 0, 0, false, 5);

/// VAT on the whole pre-tax bill: 21 %.
pub const VAT_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Regulated meter rental, €/day.
pub const METER_RENTAL_PER_DAY: Decimal = Decimal::from_parts(27, 0, 0, false, 3);

/// Social-bonus financing surcharge, €/day.
pub const SOCIAL_BONUS_PER_DAY: Decimal = Decimal::from_parts(12742, 0, 0, false, 6);

/// Published costs are expressed in cents.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Rounds a money amount to cents, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use tariff_finder::engine::round_currency;
///
/// assert_eq!(round_currency(Decimal::new(125, 3)), Decimal::new(13, 2));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Contracted power cost over the billing period.
pub fn power_term(input: &ConsumptionInput, tariff: &Tariff) -> Decimal {
    (input.contracted_power_peak * tariff.power_price_peak
        + input.contracted_power_off_peak * tariff.power_price_off_peak)
        * Decimal::from(input.billed_days)
}

/// Metered energy cost; single-period tariffs apply one rate to the total.
pub fn energy_term(input: &ConsumptionInput, tariff: &Tariff) -> Decimal {
    match tariff.energy_periods {
        EnergyPeriods::Single => input.total_energy() * tariff.energy_price_peak,
        EnergyPeriods::Three => {
            input.energy_peak * tariff.energy_price_peak
                + input.energy_flat * tariff.energy_price_flat
                + input.energy_off_peak * tariff.energy_price_off_peak
        }
    }
}

/// An amount with electricity tax and VAT applied, unrounded.
pub fn with_taxes(amount: Decimal) -> Decimal {
    let taxed = amount + amount * ELECTRICITY_TAX_RATE;
    taxed + taxed * VAT_RATE
}

/// Published cost of the reference-market tariff: the full bill net of its
/// taxed energy portion, never below zero.
pub(crate) fn net_of_energy(total: Decimal, energy_with_taxes: Decimal) -> Decimal {
    round_currency((total - energy_with_taxes).max(Decimal::ZERO))
}

/// Prices one tariff against one consumption input.
///
/// Pure and deterministic; the input is assumed validated.
pub fn tariff_cost(input: &ConsumptionInput, tariff: &Tariff) -> CostBreakdown {
    let days = Decimal::from(input.billed_days);

    let power_term = power_term(input, tariff);
    let energy_term = energy_term(input, tariff);
    let subtotal = power_term + energy_term;
    let electricity_tax = subtotal * ELECTRICITY_TAX_RATE;
    let meter_rental = METER_RENTAL_PER_DAY * days;
    let social_bonus = SOCIAL_BONUS_PER_DAY * days;
    let pre_tax_total = subtotal + electricity_tax + meter_rental + social_bonus;
    let vat = pre_tax_total * VAT_RATE;
    let raw_total = pre_tax_total + vat;

    let (energy_with_taxes, estimated_cost) = if tariff.is_reference_market_tariff {
        let energy_with_taxes = with_taxes(energy_term);
        (
            Some(energy_with_taxes),
            net_of_energy(raw_total, energy_with_taxes),
        )
    } else {
        (None, round_currency(raw_total))
    };

    tracing::debug!(
        company = %tariff.company,
        tariff = %tariff.name,
        power_term = %power_term,
        energy_term = %energy_term,
        cost = %estimated_cost,
        "priced tariff"
    );

    CostBreakdown {
        power_term,
        energy_term,
        subtotal,
        electricity_tax,
        meter_rental,
        social_bonus,
        pre_tax_total,
        vat,
        total: round_currency(raw_total),
        energy_with_taxes,
        estimated_cost,
    }
}
