//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, RecommendationRequest};
use crate::catalog::Tariff;
use crate::collaborators::{ComparisonService, TemplateExplainer};
use crate::error::Error;

/// `GET /health` → 200 + `HealthResponse` JSON
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        tariffs: state.catalog.len(),
    })
}

/// Returns every tariff in catalog order.
///
/// `GET /tariffs` → 200 + `Vec<Tariff>` JSON
pub async fn get_tariffs(State(state): State<Arc<AppState>>) -> Json<Vec<Tariff>> {
    Json(state.catalog.tariffs().to_vec())
}

/// Ranks the catalog for one consumption record.
///
/// `POST /recommendations` → 200 + comparison JSON
/// Invalid consumption or selection → 422 + `ErrorResponse`
/// Malformed JSON or missing fields → rejected by the `Json` extractor
pub async fn post_recommendations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> Response {
    if request.selection.limit == Some(0) {
        return unprocessable("selection.limit must be > 0", Some("selection.limit"));
    }

    let explainer = TemplateExplainer;
    let mut service = ComparisonService::new(&state.catalog).with_policy(request.selection);
    if request.explain {
        service = service.with_explainer(&explainer);
    }

    match service.compare(request.consumption) {
        Ok(comparison) => Json(comparison).into_response(),
        Err(Error::Validation(e)) => {
            tracing::debug!(error = %e, "rejected consumption input");
            unprocessable(&e.to_string(), Some(e.field()))
        }
        Err(e) => {
            tracing::error!(error = %e, "comparison failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                    field: None,
                }),
            )
                .into_response()
        }
    }
}

fn unprocessable(message: &str, field: Option<&str>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: message.to_string(),
            field: field.map(str::to_string),
        }),
    )
        .into_response()
}
