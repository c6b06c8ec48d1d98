use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::session::Resolution;

/// Session-gate for protected routes.
///
/// Resolves the caller before the handler runs and injects the identity as a
/// request extension. Anonymous requests are terminated here with the uniform
/// 401 body; the delegate behind the route is never invoked.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match state.resolver.resolve(request.headers()) {
        Resolution::Authenticated(caller) => {
            request.extensions_mut().insert(caller);
            Ok(next.run(request).await)
        }
        Resolution::Anonymous { reason } => {
            tracing::debug!(%reason, "unauthenticated request");
            Err(ApiError::unauthenticated())
        }
    }
}
