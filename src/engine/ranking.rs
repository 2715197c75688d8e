//! Ranking, savings filter, and truncation of priced tariffs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

use super::cost::{round_currency, tariff_cost};
use super::types::{ConsumptionInput, TariffResult};

/// Number of tariffs shown by default. The first one is the best option.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Selection rules applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Maximum number of results (must be > 0); `None` keeps every tariff.
    pub limit: Option<usize>,
    /// Drop tariffs that do not beat the current bill, when one is known.
    pub savings_only: bool,
}

impl Policy {
    /// Every tariff, sorted, nothing filtered out.
    pub const ALL: Self = Self {
        limit: None,
        savings_only: false,
    };
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            limit: Some(MAX_RECOMMENDATIONS),
            savings_only: true,
        }
    }
}

/// Ordered, possibly filtered and truncated, results of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations<'a> {
    results: Vec<TariffResult<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_bill: Option<Decimal>,
}

impl<'a> Recommendations<'a> {
    /// Cheapest tariff, if any survived the filter.
    pub fn best(&self) -> Option<&TariffResult<'a>> {
        self.results.first()
    }

    /// Largest positive saving among the results.
    pub fn max_savings(&self) -> Option<Decimal> {
        self.results
            .iter()
            .filter_map(|r| r.savings)
            .filter(|s| *s > Decimal::ZERO)
            .max()
    }

    pub fn current_bill(&self) -> Option<Decimal> {
        self.current_bill
    }

    /// True when no tariff qualified ("no better tariff found").
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn as_slice(&self) -> &[TariffResult<'a>] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TariffResult<'a>> {
        self.results.iter()
    }

    pub fn into_vec(self) -> Vec<TariffResult<'a>> {
        self.results
    }
}

/// Applies a selection [`Policy`] on top of the cost engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recommender {
    policy: Policy,
}

impl Recommender {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Prices every tariff, sorts, filters by savings, then truncates.
    ///
    /// The savings filter runs before truncation, so a capped list only
    /// ever contains tariffs that beat the current bill.
    pub fn recommend<'a>(
        &self,
        input: &ConsumptionInput,
        catalog: &'a Catalog,
    ) -> Recommendations<'a> {
        let mut results = rank_all(input, catalog);
        let current_bill = input.current_bill_amount.filter(|b| *b > Decimal::ZERO);

        if self.policy.savings_only {
            if let Some(bill) = current_bill {
                results.retain(|r| r.estimated_cost < bill);
            }
        }
        if let Some(limit) = self.policy.limit {
            results.truncate(limit);
        }

        tracing::info!(
            candidates = catalog.len(),
            selected = results.len(),
            best = results.first().map(|r| r.tariff.name.as_str()),
            "ranked tariffs"
        );

        Recommendations {
            results,
            current_bill,
        }
    }
}

/// Prices every tariff and sorts ascending by cost.
///
/// The sort is stable: tariffs with equal cost keep their catalog order.
/// Savings are rounded to cents like the costs they derive from.
pub fn rank_all<'a>(input: &ConsumptionInput, catalog: &'a Catalog) -> Vec<TariffResult<'a>> {
    let current_bill = input.current_bill_amount.filter(|b| *b > Decimal::ZERO);

    let mut results: Vec<TariffResult<'a>> = catalog
        .iter()
        .map(|tariff| {
            let breakdown = tariff_cost(input, tariff);
            TariffResult {
                tariff,
                estimated_cost: breakdown.estimated_cost,
                breakdown,
                savings: current_bill.map(|bill| round_currency(bill - breakdown.estimated_cost)),
            }
        })
        .collect();

    results.sort_by(|a, b| a.estimated_cost.cmp(&b.estimated_cost));
    results
}

/// Default comparison: capped at [`MAX_RECOMMENDATIONS`], and limited to
/// tariffs strictly cheaper than the current bill when one is supplied.
///
/// Returns an empty vector when nothing beats the current bill.
pub fn compute_recommendations<'a>(
    input: &ConsumptionInput,
    catalog: &'a Catalog,
) -> Vec<TariffResult<'a>> {
    Recommender::default().recommend(input, catalog).into_vec()
}
