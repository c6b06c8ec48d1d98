use axum::{extract::State, response::Json, Extension};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{InstructorProfile, ProfileBasics, ProfileError};
use crate::session::CallerIdentity;

/// POST /api/instructor-profile/update-basics - Upsert the caller's public
/// instructor profile basics.
///
/// Expected Input:
/// ```json
/// { "displayName": "Ana Souza", "headline": "Dados & ML", "bio": "..." }
/// ```
///
/// Returns the stored profile object directly (no envelope), matching the
/// account-area client.
pub async fn update_basics(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(basics): Json<ProfileBasics>,
) -> Result<Json<InstructorProfile>, ApiError> {
    let profile = state
        .instructor
        .update_basics(&caller, basics)
        .await
        .map_err(|e| {
            tracing::error!(
                route = "instructor-profile.update-basics",
                error = %e,
                "profile update failed"
            );
            match e {
                ProfileError::Invalid(msg) => ApiError::bad_request(msg),
                _ => ApiError::internal_server_error("Erro ao atualizar perfil"),
            }
        })?;

    Ok(Json(profile))
}
