//! API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::engine::{ConsumptionInput, Policy};

/// Body of `POST /recommendations`.
///
/// Same shape as a request TOML file, plus an optional explanation flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendationRequest {
    pub consumption: ConsumptionInput,
    #[serde(default)]
    pub selection: Policy,
    /// Attach the offline template explanation.
    #[serde(default)]
    pub explain: bool,
}

/// Liveness probe body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Number of tariffs loaded.
    pub tariffs: usize,
}

/// Error body returned with 4xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Offending input field, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
