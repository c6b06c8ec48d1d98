use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::db::{Database, HealthMonitor};
use crate::handlers::{protected, public};
use crate::runtime::RuntimeEnv;
use crate::services::{
    AccountService, ChatUsageService, InstructorProfileService, PgAccountService,
    PgChatUsageService, PgInstructorProfileService, PgPlanStore, PlanStore,
};
use crate::session::middleware::require_session;
use crate::session::provider::AdminAuth;
use crate::session::SessionResolver;

/// Shared per-process dependencies, injected into every route handler.
///
/// Delegates are trait objects so tests can swap in fakes; the production
/// wiring lives in [`AppState::postgres`].
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SessionResolver>,
    pub accounts: Arc<dyn AccountService>,
    pub chat: Arc<dyn ChatUsageService>,
    pub instructor: Arc<dyn InstructorProfileService>,
    pub plans: Arc<dyn PlanStore>,
    pub health: Arc<HealthMonitor>,
}

impl AppState {
    /// Production wiring: Postgres-backed delegates over the lazily created
    /// process pool, plus the database reachability watchdog.
    pub async fn postgres() -> Self {
        let env = RuntimeEnv::from_process_env();
        let db = Arc::new(Database::new(env.clone()));

        let health = HealthMonitor::new();
        health.spawn_prober(
            db.clone(),
            Duration::from_secs(config::config().database.health_probe_interval_secs),
        );

        let admin = AdminAuth::from_env(&env);
        if let AdminAuth::Unconfigured { missing } = &admin {
            tracing::warn!(
                ?missing,
                "auth admin API not configured; account sync will be rejected"
            );
        }

        Self {
            resolver: Arc::new(SessionResolver::from_config()),
            accounts: Arc::new(PgAccountService::new(db.clone(), admin)),
            chat: Arc::new(PgChatUsageService::new(db.clone())),
            instructor: Arc::new(PgInstructorProfileService::new(db.clone())),
            plans: Arc::new(PgPlanStore::new(db)),
            health,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/account/sync", post(protected::account::sync))
        .route("/api/chat/usage", get(protected::chat::usage))
        .route(
            "/api/instructor-profile/update-basics",
            post(protected::instructor::update_basics),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/planos", get(public::planos::list))
        // Protected API
        .merge(protected_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "ok": true,
        "name": "Mentoria API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "planos": "/api/planos (public)",
            "account": "/api/account/sync (protected)",
            "chat": "/api/chat/usage (protected)",
            "instructor": "/api/instructor-profile/update-basics (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    if state.health.current() {
        (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "ok": false,
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable"
            })),
        )
    }
}
