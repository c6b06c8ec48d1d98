use axum::{extract::State, Extension};
use serde::Serialize;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::error::ApiError;
use crate::services::ChatUsage;
use crate::session::CallerIdentity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUsageBody {
    #[serde(flatten)]
    pub usage: ChatUsage,
    /// Renewal date pre-formatted for display (dd/mm/aaaa).
    pub renews_at_formatted: String,
}

/// GET /api/chat/usage - Chat inbox metering for the authenticated caller
///
/// Expected Output (Success):
/// ```json
/// {
///   "ok": true,
///   "used": 42,
///   "limit": 500,
///   "renewsAt": "2026-09-01T00:00:00Z",
///   "renewsAtFormatted": "01/09/2026"
/// }
/// ```
pub async fn usage(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<ChatUsageBody> {
    let usage = state.chat.usage_for(&caller).await.map_err(|e| {
        tracing::error!(route = "chat.usage", error = %e, "failed to load chat usage");
        ApiError::internal_server_error("Erro ao carregar uso do chat")
    })?;

    let renews_at_formatted = usage.renews_at.format("%d/%m/%Y").to_string();

    Ok(ApiResponse::success(ChatUsageBody {
        usage,
        renews_at_formatted,
    }))
}
