use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;

use tariff_finder::config::RequestConfig;
use tariff_finder::engine::Policy;
use tariff_finder::error::ConfigError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// Full comparison, breakdowns included.
    Json,
    /// One row per recommended tariff.
    Csv,
}

/// Compare household electricity tariffs against one bill.
///
/// Consumption comes from `--request`, `--preset`, or the `typical` preset,
/// and any of the individual flags below override it.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load the request from a TOML file.
    #[clap(long, conflicts_with = "preset")]
    pub request: Option<PathBuf>,

    /// Use a built-in request preset (typical, high_usage, night_owl).
    #[clap(long)]
    pub preset: Option<String>,

    /// Tariff catalog TOML; the built-in catalog is used otherwise.
    #[clap(long, env = "TARIFF_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[clap(flatten)]
    pub consumption: ConsumptionArgs,

    /// The amount of your current bill, in euros.
    #[clap(long = "current-bill")]
    pub current_bill: Option<Decimal>,

    /// Maximum number of tariffs to show.
    #[clap(long, conflicts_with = "all")]
    pub limit: Option<usize>,

    /// Show every tariff, including ones that cost more than the current bill.
    #[clap(long)]
    pub all: bool,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Skip the explanation paragraph.
    #[clap(long)]
    pub no_explain: bool,

    /// Write the catalog as CSV to this path and exit.
    #[clap(long = "export-catalog")]
    pub export_catalog: Option<PathBuf>,

    /// Start the REST API instead of running one comparison (needs the `api` feature).
    #[clap(long)]
    pub serve: bool,

    #[clap(long, default_value = "3000", env = "PORT")]
    pub port: u16,
}

/// Per-field overrides of the loaded consumption record.
#[derive(Debug, Clone, Default, Parser)]
pub struct ConsumptionArgs {
    #[clap(long = "days")]
    pub billed_days: Option<u32>,

    /// Contracted power in P1, kW.
    #[clap(long = "power-peak")]
    pub contracted_power_peak: Option<Decimal>,

    /// Contracted power in P2, kW.
    #[clap(long = "power-off-peak")]
    pub contracted_power_off_peak: Option<Decimal>,

    /// Energy in P1 (punta), kWh.
    #[clap(long = "energy-peak")]
    pub energy_peak: Option<Decimal>,

    /// Energy in P2 (llano), kWh.
    #[clap(long = "energy-flat")]
    pub energy_flat: Option<Decimal>,

    /// Energy in P3 (valle), kWh.
    #[clap(long = "energy-off-peak")]
    pub energy_off_peak: Option<Decimal>,
}

impl Args {
    /// Resolves the request source and applies every override.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the request file or preset cannot be loaded.
    pub fn request_config(&self) -> Result<RequestConfig, ConfigError> {
        let mut cfg = match (&self.request, &self.preset) {
            (Some(path), _) => RequestConfig::from_toml_file(path)?,
            (None, Some(name)) => RequestConfig::from_preset(name)?,
            (None, None) => RequestConfig::typical(),
        };

        let c = &mut cfg.consumption;
        let o = &self.consumption;
        if let Some(v) = o.billed_days {
            c.billed_days = v;
        }
        if let Some(v) = o.contracted_power_peak {
            c.contracted_power_peak = v;
        }
        if let Some(v) = o.contracted_power_off_peak {
            c.contracted_power_off_peak = v;
        }
        if let Some(v) = o.energy_peak {
            c.energy_peak = v;
        }
        if let Some(v) = o.energy_flat {
            c.energy_flat = v;
        }
        if let Some(v) = o.energy_off_peak {
            c.energy_off_peak = v;
        }
        if self.current_bill.is_some() {
            c.current_bill_amount = self.current_bill;
        }

        if self.all {
            cfg.selection = Policy::ALL;
        } else if let Some(limit) = self.limit {
            cfg.selection.limit = Some(limit);
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tariff-finder").chain(args.iter().copied()))
            .expect("parse should succeed")
    }

    #[test]
    fn defaults_to_typical_preset() {
        let args = parse(&[]);
        let cfg = args.request_config().expect("typical should load");
        assert_eq!(cfg, RequestConfig::typical());
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let args = parse(&[
            "--preset",
            "night_owl",
            "--days",
            "31",
            "--energy-flat",
            "12.5",
            "--current-bill",
            "88.10",
            "--limit",
            "2",
        ]);
        let cfg = args.request_config().expect("preset should load");
        assert_eq!(cfg.consumption.billed_days, 31);
        assert_eq!(cfg.consumption.energy_flat, Decimal::new(125, 1));
        assert_eq!(
            cfg.consumption.energy_off_peak,
            RequestConfig::night_owl().consumption.energy_off_peak
        );
        assert_eq!(cfg.consumption.current_bill_amount, Some(Decimal::new(8810, 2)));
        assert_eq!(cfg.selection.limit, Some(2));
    }

    #[test]
    fn all_disables_filter_and_cap() {
        let cfg = parse(&["--all"]).request_config().expect("should load");
        assert_eq!(cfg.selection, Policy::ALL);
    }

    #[test]
    fn request_and_preset_are_mutually_exclusive() {
        let result = Args::try_parse_from([
            "tariff-finder",
            "--request",
            "a.toml",
            "--preset",
            "typical",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_preset_is_a_config_error() {
        let err = parse(&["--preset", "bogus"]).request_config().unwrap_err();
        assert_eq!(err.field, "preset");
    }

    #[test]
    fn bad_decimal_is_rejected() {
        assert!(Args::try_parse_from(["tariff-finder", "--energy-peak", "lots"]).is_err());
    }

    #[test]
    fn format_parses_value_enum() {
        assert_eq!(parse(&["--format", "csv"]).format, OutputFormat::Csv);
    }
}
