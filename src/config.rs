//! TOML-based comparison requests and preset definitions.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::{ConsumptionInput, Policy};
use crate::error::ConfigError;

/// Top-level request configuration parsed from TOML.
///
/// The `[consumption]` table is required; `[selection]` defaults to the
/// standard policy. Load from TOML with [`RequestConfig::from_toml_file`]
/// or use [`RequestConfig::typical`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    /// Household billing data.
    pub consumption: ConsumptionInput,
    /// How many results to keep and whether to filter by savings.
    #[serde(default)]
    pub selection: Policy,
}

impl RequestConfig {
    /// 30 days, 4.6 kW in both periods, 100/150/200 kWh.
    pub fn typical() -> Self {
        Self {
            consumption: ConsumptionInput {
                billed_days: 30,
                contracted_power_peak: Decimal::new(46, 1),
                contracted_power_off_peak: Decimal::new(46, 1),
                energy_peak: Decimal::from(100),
                energy_flat: Decimal::from(150),
                energy_off_peak: Decimal::from(200),
                current_bill_amount: None,
            },
            selection: Policy::default(),
        }
    }

    /// Larger home: 5.75 kW, about 700 kWh a month, peak-heavy.
    pub fn high_usage() -> Self {
        Self {
            consumption: ConsumptionInput {
                billed_days: 31,
                contracted_power_peak: Decimal::new(575, 2),
                contracted_power_off_peak: Decimal::new(575, 2),
                energy_peak: Decimal::from(260),
                energy_flat: Decimal::from(250),
                energy_off_peak: Decimal::from(190),
                current_bill_amount: None,
            },
            selection: Policy::default(),
        }
    }

    /// Most energy at night: EV charging, timed appliances.
    pub fn night_owl() -> Self {
        Self {
            consumption: ConsumptionInput {
                billed_days: 30,
                contracted_power_peak: Decimal::new(345, 2),
                contracted_power_off_peak: Decimal::new(69, 1),
                energy_peak: Decimal::from(60),
                energy_flat: Decimal::from(90),
                energy_off_peak: Decimal::from(350),
                current_bill_amount: None,
            },
            selection: Policy::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["typical", "high_usage", "night_owl"];

    /// Loads a request from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "typical" => Ok(Self::typical()),
            "high_usage" => Ok(Self::high_usage()),
            "night_owl" => Ok(Self::night_owl()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a request from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("request", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a request from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, misses a consumption
    /// field, or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = self
            .consumption
            .violations()
            .iter()
            .map(|v| ConfigError::new(format!("consumption.{}", v.field()), v.constraint()))
            .collect();

        if self.selection.limit == Some(0) {
            errors.push(ConfigError::new("selection.limit", "must be > 0"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MAX_RECOMMENDATIONS;

    #[test]
    fn typical_preset_valid() {
        let cfg = RequestConfig::typical();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "typical should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = RequestConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert!(e.message.contains("night_owl"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in RequestConfig::PRESETS {
            let cfg = RequestConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn billing_period_longer_than_a_year_rejected() {
        let mut cfg = RequestConfig::typical();
        cfg.consumption.billed_days = 400;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "consumption.billed_days");
        assert_eq!(errors[0].message, "must be <= 366, got 400");
    }

    #[test]
    fn night_owl_is_off_peak_heavy() {
        let c = RequestConfig::night_owl().consumption;
        assert!(c.energy_off_peak > c.energy_peak + c.energy_flat);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[consumption]
billed_days = 31
contracted_power_peak = 3.45
contracted_power_off_peak = 3.45
energy_peak = 80.5
energy_flat = 120
energy_off_peak = 210
current_bill_amount = 95.40

[selection]
limit = 2
savings_only = false
"#;
        let cfg = RequestConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.consumption.billed_days), Some(31));
        assert_eq!(
            cfg.as_ref().map(|c| c.consumption.energy_peak),
            Some(Decimal::new(805, 1))
        );
        assert_eq!(
            cfg.as_ref().and_then(|c| c.consumption.current_bill_amount),
            Some(Decimal::new(9540, 2))
        );
        assert_eq!(cfg.as_ref().and_then(|c| c.selection.limit), Some(2));
    }

    #[test]
    fn missing_selection_uses_default_policy() {
        let toml = r#"
[consumption]
billed_days = 30
contracted_power_peak = 4.6
contracted_power_off_peak = 4.6
energy_peak = 100
energy_flat = 150
energy_off_peak = 200
"#;
        let cfg = RequestConfig::from_toml_str(toml);
        assert_eq!(
            cfg.as_ref().ok().and_then(|c| c.selection.limit),
            Some(MAX_RECOMMENDATIONS)
        );
        assert_eq!(cfg.ok().map(|c| c.consumption), Some(RequestConfig::typical().consumption));
    }

    #[test]
    fn missing_consumption_field_rejected() {
        let toml = r#"
[consumption]
billed_days = 30
contracted_power_peak = 4.6
"#;
        assert!(RequestConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[consumption]
billed_days = 30
contracted_power_peak = 4.6
contracted_power_off_peak = 4.6
energy_peak = 100
energy_flat = 150
energy_off_peak = 200
bogus_field = true
"#;
        let result = RequestConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = RequestConfig::typical();
        cfg.consumption.billed_days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumption.billed_days"));
    }

    #[test]
    fn validation_catches_negative_energy() {
        let mut cfg = RequestConfig::typical();
        cfg.consumption.energy_flat = Decimal::new(-1, 0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumption.energy_flat"));
    }

    #[test]
    fn validation_catches_zero_limit() {
        let mut cfg = RequestConfig::typical();
        cfg.selection.limit = Some(0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "selection.limit"));
    }
}
