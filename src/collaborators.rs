//! External collaborators around the engine and the orchestration that
//! isolates their failures.
//!
//! Bill extraction and explanation generation live behind traits so the
//! engine stays pure and tests can swap in doubles. An extraction failure
//! aborts a comparison; an explanation failure only drops the prose.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EnergyPeriods};
use crate::engine::{
    ConsumptionInput, ConsumptionProfile, Period, Policy, Recommendations, Recommender,
    TariffResult, round_currency,
};
use crate::error::{CollaboratorError, Error, ValidationError};

/// Turns a bill document (PDF or image bytes) into consumption fields.
pub trait BillExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns `CollaboratorError::Extraction` when the document cannot be read.
    fn extract(&self, document: &[u8]) -> Result<ExtractedBill, CollaboratorError>;
}

/// Writes a short, user-facing explanation of a ranking.
///
/// Receives read-only data and has no influence on the ranking itself.
pub trait Explainer: Send + Sync {
    /// # Errors
    ///
    /// Returns `CollaboratorError::Explanation` when no text could be produced.
    fn explain(
        &self,
        input: &ConsumptionInput,
        recommendations: &[TariffResult<'_>],
    ) -> Result<String, CollaboratorError>;
}

/// Whatever an extractor managed to read off a bill. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedBill {
    pub billed_days: Option<u32>,
    pub contracted_power_peak: Option<Decimal>,
    pub contracted_power_off_peak: Option<Decimal>,
    pub energy_peak: Option<Decimal>,
    pub energy_flat: Option<Decimal>,
    pub energy_off_peak: Option<Decimal>,
    /// Amount the bill charges, used as the current bill.
    pub total_amount: Option<Decimal>,
}

impl ExtractedBill {
    /// Converts into a validated input.
    ///
    /// Absent fields are never defaulted to zero.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` for the first absent field, or the
    /// first constraint the extracted values violate.
    pub fn into_input(self) -> Result<ConsumptionInput, ValidationError> {
        fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
            value.ok_or(ValidationError::Missing { field })
        }

        let input = ConsumptionInput {
            billed_days: require(self.billed_days, "billed_days")?,
            contracted_power_peak: require(self.contracted_power_peak, "contracted_power_peak")?,
            contracted_power_off_peak: require(
                self.contracted_power_off_peak,
                "contracted_power_off_peak",
            )?,
            energy_peak: require(self.energy_peak, "energy_peak")?,
            energy_flat: require(self.energy_flat, "energy_flat")?,
            energy_off_peak: require(self.energy_off_peak, "energy_off_peak")?,
            current_bill_amount: self.total_amount,
        };
        input.validate()?;
        Ok(input)
    }
}

/// Offline explainer producing deterministic English prose.
///
/// Covers the dominant consumption period, why the best tariff fits, and
/// one usage tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl Explainer for TemplateExplainer {
    fn explain(
        &self,
        input: &ConsumptionInput,
        recommendations: &[TariffResult<'_>],
    ) -> Result<String, CollaboratorError> {
        let profile = ConsumptionProfile::from_input(input);
        let mut text = match profile.dominant_period() {
            Some(share) => format!(
                "Most of your energy ({}%, {} kWh) is used in the {} period.",
                share.percent, share.energy_kwh, share.period
            ),
            None => "No energy was metered in this billing period.".to_string(),
        };

        let Some(best) = recommendations.first() else {
            match input.current_bill_amount {
                Some(bill) => text.push_str(&format!(
                    " None of the available tariffs beats your current bill of {:.2} €.",
                    round_currency(bill)
                )),
                None => text.push_str(" No tariff could be priced."),
            }
            return Ok(text);
        };

        text.push_str(&format!(
            " {} {} is the cheapest option at {:.2} €",
            best.tariff.company, best.tariff.name, best.estimated_cost
        ));
        match best.savings {
            Some(s) if s > Decimal::ZERO => text.push_str(&format!(
                ", {:.2} € less than your current bill.",
                round_currency(s)
            )),
            _ => text.push('.'),
        }

        let dominant = profile.dominant_period().map(|s| s.period);
        let reason = match (best.tariff.energy_periods, dominant) {
            (EnergyPeriods::Three, Some(Period::OffPeak)) => {
                " Its low off-peak energy price rewards the share of your consumption that already falls at night."
            }
            (EnergyPeriods::Three, _) => {
                " It bills energy in three periods, so moving consumption out of peak hours lowers the bill further."
            }
            (EnergyPeriods::Single, _) => {
                " It charges one energy price at every hour, so your bill does not depend on when you consume."
            }
        };
        text.push_str(reason);

        if best.tariff.has_commitment {
            text.push_str(" Note that this offer includes a commitment period.");
        }

        text.push_str(
            " Tip: running the dishwasher, washing machine or EV charger between 00h and 08h uses the cheapest hours.",
        );
        Ok(text)
    }
}

/// Outcome of one comparison request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    pub input: ConsumptionInput,
    pub profile: ConsumptionProfile,
    pub recommendations: Recommendations<'a>,
    /// Absent when no explainer is configured or it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Runs extraction, validation, ranking and explanation against one catalog.
pub struct ComparisonService<'c> {
    catalog: &'c Catalog,
    recommender: Recommender,
    extractor: Option<&'c dyn BillExtractor>,
    explainer: Option<&'c dyn Explainer>,
}

impl<'c> ComparisonService<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            recommender: Recommender::default(),
            extractor: None,
            explainer: None,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.recommender = Recommender::new(policy);
        self
    }

    pub fn with_extractor(mut self, extractor: &'c dyn BillExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_explainer(mut self, explainer: &'c dyn Explainer) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Validates `input`, ranks the catalog and attaches an explanation.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an input that cannot be priced.
    pub fn compare(&self, input: ConsumptionInput) -> Result<Comparison<'c>, Error> {
        input.validate()?;

        let profile = ConsumptionProfile::from_input(&input);
        let recommendations = self.recommender.recommend(&input, self.catalog);
        let explanation = self.explainer.and_then(|explainer| {
            match explainer.explain(&input, recommendations.as_slice()) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "explanation unavailable, continuing without it");
                    None
                }
            }
        });

        Ok(Comparison {
            input,
            profile,
            recommendations,
            explanation,
        })
    }

    /// Extracts consumption from a bill document and compares it.
    ///
    /// `current_bill` overrides the amount read from the document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Collaborator` if no extractor is configured or it
    /// fails, and `Error::Validation` if the extracted record is incomplete.
    pub fn compare_document(
        &self,
        document: &[u8],
        current_bill: Option<Decimal>,
    ) -> Result<Comparison<'c>, Error> {
        let extractor = self.extractor.ok_or_else(|| {
            CollaboratorError::Extraction("no bill extractor configured".to_string())
        })?;

        let mut bill = extractor.extract(document)?;
        tracing::debug!(bytes = document.len(), ?bill, "bill extracted");
        if current_bill.is_some() {
            bill.total_amount = current_bill;
        }

        self.compare(bill.into_input()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tariff;

    fn input() -> ConsumptionInput {
        ConsumptionInput {
            billed_days: 30,
            contracted_power_peak: Decimal::new(46, 1),
            contracted_power_off_peak: Decimal::new(46, 1),
            energy_peak: Decimal::from(100),
            energy_flat: Decimal::from(150),
            energy_off_peak: Decimal::from(200),
            current_bill_amount: None,
        }
    }

    fn full_bill() -> ExtractedBill {
        ExtractedBill {
            billed_days: Some(30),
            contracted_power_peak: Some(Decimal::new(46, 1)),
            contracted_power_off_peak: Some(Decimal::new(46, 1)),
            energy_peak: Some(Decimal::from(100)),
            energy_flat: Some(Decimal::from(150)),
            energy_off_peak: Some(Decimal::from(200)),
            total_amount: Some(Decimal::from(140)),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Tariff::single_rate(
                "A",
                "Flat",
                Decimal::new(1, 1),
                Decimal::new(5, 2),
                Decimal::new(13, 2),
            ),
            Tariff::time_of_use(
                "B",
                "Night",
                Decimal::new(1, 1),
                Decimal::new(5, 2),
                [Decimal::new(20, 2), Decimal::new(15, 2), Decimal::new(7, 2)],
            ),
        ])
        .unwrap()
    }

    struct FixedExtractor(Result<ExtractedBill, CollaboratorError>);

    impl BillExtractor for FixedExtractor {
        fn extract(&self, _document: &[u8]) -> Result<ExtractedBill, CollaboratorError> {
            self.0.clone()
        }
    }

    struct FailingExplainer;

    impl Explainer for FailingExplainer {
        fn explain(
            &self,
            _input: &ConsumptionInput,
            _recommendations: &[TariffResult<'_>],
        ) -> Result<String, CollaboratorError> {
            Err(CollaboratorError::Explanation("service down".into()))
        }
    }

    #[test]
    fn complete_bill_converts() {
        let input = full_bill().into_input().unwrap();
        assert_eq!(input.billed_days, 30);
        assert_eq!(input.current_bill_amount, Some(Decimal::from(140)));
    }

    #[test]
    fn missing_field_is_not_defaulted() {
        let bill = ExtractedBill {
            energy_flat: None,
            ..full_bill()
        };
        assert_eq!(
            bill.into_input(),
            Err(ValidationError::Missing {
                field: "energy_flat"
            })
        );
    }

    #[test]
    fn extracted_values_are_validated() {
        let bill = ExtractedBill {
            billed_days: Some(0),
            ..full_bill()
        };
        assert_eq!(bill.into_input().map_err(|e| e.field()), Err("billed_days"));
    }

    #[test]
    fn partial_json_record_deserializes() {
        let bill: ExtractedBill =
            serde_json::from_str(r#"{"billed_days": 31, "energy_peak": "80.5"}"#).unwrap();
        assert_eq!(bill.billed_days, Some(31));
        assert_eq!(bill.energy_peak, Some(Decimal::new(805, 1)));
        assert!(bill.contracted_power_peak.is_none());
    }

    #[test]
    fn compare_ranks_and_explains() {
        let catalog = catalog();
        let explainer = TemplateExplainer;
        let service = ComparisonService::new(&catalog).with_explainer(&explainer);
        let comparison = service.compare(input()).unwrap();
        assert_eq!(comparison.recommendations.len(), 2);
        let text = comparison.explanation.unwrap();
        assert!(text.contains("off-peak (P3)"));
        assert!(text.contains("00h and 08h"));
    }

    #[test]
    fn explanation_failure_keeps_ranking() {
        let catalog = catalog();
        let service = ComparisonService::new(&catalog).with_explainer(&FailingExplainer);
        let comparison = service.compare(input()).unwrap();
        assert!(comparison.explanation.is_none());
        assert_eq!(comparison.recommendations.len(), 2);
    }

    #[test]
    fn invalid_input_is_rejected_before_ranking() {
        let catalog = catalog();
        let mut bad = input();
        bad.contracted_power_peak = Decimal::ZERO;
        let result = ComparisonService::new(&catalog).compare(bad);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn extraction_failure_aborts() {
        let catalog = catalog();
        let extractor = FixedExtractor(Err(CollaboratorError::Extraction("unreadable".into())));
        let result = ComparisonService::new(&catalog)
            .with_extractor(&extractor)
            .compare_document(b"%PDF", None);
        assert!(matches!(
            result,
            Err(Error::Collaborator(CollaboratorError::Extraction(_)))
        ));
    }

    #[test]
    fn no_extractor_configured_is_an_error() {
        let catalog = catalog();
        let result = ComparisonService::new(&catalog).compare_document(b"%PDF", None);
        assert!(matches!(result, Err(Error::Collaborator(_))));
    }

    #[test]
    fn explicit_current_bill_overrides_extracted_amount() {
        let catalog = catalog();
        let extractor = FixedExtractor(Ok(full_bill()));
        let comparison = ComparisonService::new(&catalog)
            .with_extractor(&extractor)
            .compare_document(b"%PDF", Some(Decimal::from(500)))
            .unwrap();
        assert_eq!(comparison.input.current_bill_amount, Some(Decimal::from(500)));
        assert_eq!(comparison.recommendations.current_bill(), Some(Decimal::from(500)));
    }

    #[test]
    fn template_rounds_savings_half_up() {
        let catalog = catalog();
        let explainer = TemplateExplainer;
        let mut with_bill = input();
        // Night costs 99.63 €.
        with_bill.current_bill_amount = Some(Decimal::new(109_639, 3));
        let comparison = ComparisonService::new(&catalog)
            .with_explainer(&explainer)
            .compare(with_bill)
            .unwrap();
        let text = comparison.explanation.unwrap();
        assert!(text.contains("B Night is the cheapest option at 99.63 €"));
        assert!(text.contains("10.01 € less than your current bill."));
    }

    #[test]
    fn oversized_input_is_rejected_before_ranking() {
        let catalog = catalog();
        let mut huge = input();
        huge.energy_peak = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let result = ComparisonService::new(&catalog).compare(huge);
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::TooLarge {
                field: "energy_peak",
                ..
            }))
        ));
    }

    #[test]
    fn template_reports_when_nothing_beats_the_bill() {
        let mut with_bill = input();
        with_bill.current_bill_amount = Some(Decimal::ONE);
        let text = TemplateExplainer.explain(&with_bill, &[]).unwrap();
        assert!(text.contains("beats your current bill of 1.00 €"));

        with_bill.current_bill_amount = Some(Decimal::new(5, 3));
        let text = TemplateExplainer.explain(&with_bill, &[]).unwrap();
        assert!(text.contains("beats your current bill of 0.01 €"));
    }
}
