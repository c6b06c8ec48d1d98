use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{AccountSyncError, SyncedAccount};
use crate::session::{CallerIdentity, UserType};

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    /// Role the client is onboarding as; only honored on first sync.
    #[serde(rename = "userType", default)]
    pub user_type: Option<UserType>,
}

/// POST /api/account/sync?userType=instructor - Mirror the provider user
/// into the local account and resolve the caller's role.
///
/// Expected Output (Success):
/// ```json
/// {
///   "ok": true,
///   "role": "instructor",
///   "profile": { "userId": "...", "displayName": "..." }
/// }
/// ```
///
/// Identity failures (the session's user no longer exists at the provider)
/// map to 401; storage and provider-transport failures map to 500.
pub async fn sync(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(query): Query<SyncQuery>,
) -> ApiResult<SyncedAccount> {
    let synced = state
        .accounts
        .sync_account(&caller, query.user_type)
        .await
        .map_err(|e| {
            tracing::error!(route = "account.sync", error = %e, "account sync failed");
            match e {
                AccountSyncError::Identity(_) => {
                    ApiError::unauthorized("Falha ao sincronizar conta")
                }
                _ => ApiError::internal_server_error("Erro ao sincronizar conta"),
            }
        })?;

    Ok(ApiResponse::success(synced))
}
