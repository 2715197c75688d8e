//! Consumption split across time-of-use periods.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::types::ConsumptionInput;

/// Energy time-of-use period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// P1, punta.
    Peak,
    /// P2, llano.
    Flat,
    /// P3, valle.
    OffPeak,
}

impl Period {
    pub const ALL: [Self; 3] = [Self::Peak, Self::Flat, Self::OffPeak];
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Peak => "peak (P1)",
            Self::Flat => "flat (P2)",
            Self::OffPeak => "off-peak (P3)",
        })
    }
}

/// One period's energy and its whole-percent share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodShare {
    pub period: Period,
    pub energy_kwh: Decimal,
    pub percent: u8,
}

/// Per-period energy with integer percentages that always add up to 100.
///
/// Percentages use the largest-remainder method: floor every exact share,
/// then hand the missing points to the largest fractional parts. Ties go
/// to the earlier period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionProfile {
    total_kwh: Decimal,
    shares: [PeriodShare; 3],
}

impl ConsumptionProfile {
    pub fn from_input(input: &ConsumptionInput) -> Self {
        let energies = [input.energy_peak, input.energy_flat, input.energy_off_peak];
        let total_kwh = input.total_energy();
        let percents = largest_remainder_percents(energies, total_kwh);

        let mut shares = [PeriodShare {
            period: Period::Peak,
            energy_kwh: Decimal::ZERO,
            percent: 0,
        }; 3];
        for (i, share) in shares.iter_mut().enumerate() {
            *share = PeriodShare {
                period: Period::ALL[i],
                energy_kwh: energies[i],
                percent: percents[i],
            };
        }

        Self { total_kwh, shares }
    }

    pub fn total_kwh(&self) -> Decimal {
        self.total_kwh
    }

    pub fn shares(&self) -> &[PeriodShare; 3] {
        &self.shares
    }

    /// Period with the most energy; `None` when nothing was consumed.
    pub fn dominant_period(&self) -> Option<PeriodShare> {
        if self.total_kwh.is_zero() {
            return None;
        }
        let mut best = self.shares[0];
        for share in &self.shares[1..] {
            if share.energy_kwh > best.energy_kwh {
                best = *share;
            }
        }
        Some(best)
    }
}

fn largest_remainder_percents(energies: [Decimal; 3], total: Decimal) -> [u8; 3] {
    if total <= Decimal::ZERO {
        return [0; 3];
    }

    let hundred = Decimal::ONE_HUNDRED;
    let exact = energies.map(|e| e * hundred / total);
    let mut floors = exact.map(|x| x.floor().to_u8().unwrap_or(0));

    let assigned: u8 = floors.iter().sum();
    let missing = 100_u8.saturating_sub(assigned) as usize;

    let mut order = [0_usize, 1, 2];
    // Stable: equal fractions keep period order.
    order.sort_by(|&a, &b| exact[b].fract().cmp(&exact[a].fract()));
    for &i in order.iter().take(missing) {
        floors[i] += 1;
    }

    floors
}
