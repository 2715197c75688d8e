//! CSV export for ranked results and the tariff catalog.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::catalog::Tariff;
use crate::engine::{TariffResult, round_currency};

/// Column header for ranked results.
const RESULTS_HEADER: &str = "rank,company,name,energy_period_count,estimated_cost,savings,\
                              power_term,energy_term,electricity_tax,meter_rental,\
                              social_bonus,vat,total";

/// Column header for the raw catalog.
const CATALOG_HEADER: &str = "company,name,logo_url,power_price_peak,power_price_off_peak,\
                              energy_period_count,energy_price_peak,energy_price_flat,\
                              energy_price_off_peak,offer_url,has_commitment,\
                              is_reference_market_tariff";

/// Exports ranked results to a CSV file at the given path.
///
/// # Arguments
///
/// * `results` - Results in ranking order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_results_csv(results: &[TariffResult<'_>], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_results_csv(results, io::BufWriter::new(file))
}

/// Writes ranked results as CSV to any writer.
///
/// Money columns are rounded to cents; intermediate terms keep full
/// precision. `savings` is empty when no current bill was given.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_results_csv(results: &[TariffResult<'_>], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(RESULTS_HEADER.split(',').map(str::trim))?;

    for (i, r) in results.iter().enumerate() {
        let b = &r.breakdown;
        wtr.write_record(&[
            (i + 1).to_string(),
            r.tariff.company.clone(),
            r.tariff.name.clone(),
            r.tariff.energy_periods.to_string(),
            format!("{:.2}", r.estimated_cost),
            r.savings
                .map(|s| format!("{:.2}", round_currency(s)))
                .unwrap_or_default(),
            b.power_term.to_string(),
            b.energy_term.to_string(),
            b.electricity_tax.to_string(),
            b.meter_rental.to_string(),
            b.social_bonus.to_string(),
            b.vat.to_string(),
            format!("{:.2}", b.total),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the catalog to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_catalog_csv(tariffs: &[Tariff], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_catalog_csv(tariffs, io::BufWriter::new(file))
}

/// Writes every tariff as one CSV row, in catalog order.
///
/// Prices are written exactly as loaded. Fields containing commas are
/// quoted by the writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_catalog_csv(tariffs: &[Tariff], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CATALOG_HEADER.split(',').map(str::trim))?;

    for t in tariffs {
        wtr.write_record(&[
            t.company.clone(),
            t.name.clone(),
            t.logo_url.clone().unwrap_or_default(),
            t.power_price_peak.to_string(),
            t.power_price_off_peak.to_string(),
            t.energy_periods.to_string(),
            t.energy_price_peak.to_string(),
            t.energy_price_flat.to_string(),
            t.energy_price_off_peak.to_string(),
            t.offer_url.clone().unwrap_or_default(),
            t.has_commitment.to_string(),
            t.is_reference_market_tariff.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
