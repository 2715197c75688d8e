//! Plain-text rendering of a comparison.

use std::fmt;

use crate::collaborators::Comparison;
use crate::engine::round_currency;

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.input;
        writeln!(f, "--- Consumption ---")?;
        writeln!(f, "Billed days:           {}", c.billed_days)?;
        writeln!(
            f,
            "Contracted power:      {} kW (P1) / {} kW (P2)",
            c.contracted_power_peak, c.contracted_power_off_peak
        )?;
        writeln!(f, "Total energy:          {} kWh", self.profile.total_kwh())?;
        for share in self.profile.shares() {
            writeln!(
                f,
                "  {:<20}{} kWh ({}%)",
                share.period.to_string(),
                share.energy_kwh,
                share.percent
            )?;
        }
        if let Some(bill) = c.current_bill_amount {
            writeln!(f, "Current bill:          {:.2} €", round_currency(bill))?;
        }

        writeln!(f)?;
        writeln!(f, "--- Recommendations ---")?;
        if self.recommendations.is_empty() {
            match self.recommendations.current_bill() {
                Some(bill) => writeln!(
                    f,
                    "No tariff beats your current bill of {:.2} €.",
                    round_currency(bill)
                )?,
                None => writeln!(f, "No tariffs to compare.")?,
            }
        } else {
            for (i, r) in self.recommendations.iter().enumerate() {
                writeln!(f, "{:>2}. {r}", i + 1)?;
            }
            if let Some(best) = self.recommendations.best() {
                writeln!(
                    f,
                    "Best option:           {} {} ({:.2} €)",
                    best.tariff.company, best.tariff.name, best.estimated_cost
                )?;
            }
            if let Some(savings) = self.recommendations.max_savings() {
                writeln!(f, "Max savings:           {savings:.2} €")?;
            }
        }

        if let Some(text) = &self.explanation {
            writeln!(f)?;
            writeln!(f, "--- Why ---")?;
            write!(f, "{text}")?;
        }
        Ok(())
    }
}
