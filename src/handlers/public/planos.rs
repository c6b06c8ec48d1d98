use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::app::AppState;

/// GET /api/planos - Public subscription plan listing
///
/// Expected Output (Success):
/// ```json
/// {
///   "ok": true,
///   "plans": [
///     { "id": "...", "name": "Básico", "priceCents": 500, ... }
///   ]
/// }
/// ```
///
/// Plans are returned in non-decreasing `priceCents` order regardless of how
/// the store yields them.
pub async fn list(State(state): State<AppState>) -> Response {
    match state.plans.list_active().await {
        Ok(mut plans) => {
            plans.sort_by_key(|plan| plan.price_cents);
            Json(json!({ "ok": true, "plans": plans })).into_response()
        }
        Err(e) => {
            tracing::error!(route = "planos", error = %e, "failed to load plans");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "Erro ao carregar planos" })),
            )
                .into_response()
        }
    }
}
