#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use mentoria_api::app::{self, AppState};
use mentoria_api::db::HealthMonitor;
use mentoria_api::services::{
    AccountService, AccountSyncError, ChatUsage, ChatUsageError, ChatUsageService,
    InstructorProfile, InstructorProfileService, Plan, PlanError, PlanStore, ProfileBasics,
    ProfileError, SyncedAccount,
};
use mentoria_api::session::{CallerIdentity, Claims, SessionResolver, UserType};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Bearer token the test resolver accepts for the given user.
pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some("teste@mentoria.app".to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: None,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

/// Token that is syntactically valid but already expired.
pub fn expired_token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: None,
        role: None,
        user_metadata: None,
        exp: now - 3600,
        iat: now - 7200,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

// ---------------------------------------------------------------------------
// Fake delegates with call counters
// ---------------------------------------------------------------------------

pub enum AccountBehavior {
    Ok(UserType, Value),
    IdentityFailure,
    StorageFailure,
}

pub struct FakeAccounts {
    pub calls: AtomicUsize,
    pub last_requested: Mutex<Option<UserType>>,
    behavior: AccountBehavior,
}

impl FakeAccounts {
    pub fn with(behavior: AccountBehavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_requested: Mutex::new(None),
            behavior,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountService for FakeAccounts {
    async fn sync_account(
        &self,
        _caller: &CallerIdentity,
        requested: Option<UserType>,
    ) -> Result<SyncedAccount, AccountSyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_requested.lock().expect("lock") = requested;
        match &self.behavior {
            AccountBehavior::Ok(role, profile) => Ok(SyncedAccount {
                role: *role,
                profile: profile.clone(),
            }),
            AccountBehavior::IdentityFailure => Err(AccountSyncError::Identity(
                "usuário não existe no provedor".to_string(),
            )),
            AccountBehavior::StorageFailure => Err(AccountSyncError::Provider(
                "provedor indisponível".to_string(),
            )),
        }
    }
}

pub enum ChatBehavior {
    Ok(ChatUsage),
    Failure,
}

pub struct FakeChat {
    pub calls: AtomicUsize,
    behavior: ChatBehavior,
}

impl FakeChat {
    pub fn with(behavior: ChatBehavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behavior,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatUsageService for FakeChat {
    async fn usage_for(&self, _caller: &CallerIdentity) -> Result<ChatUsage, ChatUsageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ChatBehavior::Ok(usage) => Ok(usage.clone()),
            ChatBehavior::Failure => Err(ChatUsageError::Db(
                mentoria_api::db::DbError::Unconfigured("DATABASE_URL"),
            )),
        }
    }
}

pub enum InstructorBehavior {
    Ok(InstructorProfile),
    Invalid,
    Failure,
}

pub struct FakeInstructor {
    pub calls: AtomicUsize,
    behavior: InstructorBehavior,
}

impl FakeInstructor {
    pub fn with(behavior: InstructorBehavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behavior,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstructorProfileService for FakeInstructor {
    async fn update_basics(
        &self,
        _caller: &CallerIdentity,
        _basics: ProfileBasics,
    ) -> Result<InstructorProfile, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            InstructorBehavior::Ok(profile) => Ok(profile.clone()),
            InstructorBehavior::Invalid => Err(ProfileError::Invalid(
                "Nome de exibição é obrigatório".to_string(),
            )),
            InstructorBehavior::Failure => Err(ProfileError::Db(
                mentoria_api::db::DbError::Unconfigured("DATABASE_URL"),
            )),
        }
    }
}

pub enum PlanBehavior {
    Ok(Vec<Plan>),
    Failure,
}

pub struct FakePlans {
    pub calls: AtomicUsize,
    behavior: PlanBehavior,
}

impl FakePlans {
    pub fn with(behavior: PlanBehavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behavior,
        })
    }
}

#[async_trait]
impl PlanStore for FakePlans {
    async fn list_active(&self) -> Result<Vec<Plan>, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            PlanBehavior::Ok(plans) => Ok(plans.clone()),
            PlanBehavior::Failure => Err(PlanError::Db(
                mentoria_api::db::DbError::Unconfigured("DATABASE_URL"),
            )),
        }
    }
}

pub fn plan(name: &str, price_cents: i64) -> Plan {
    Plan {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        price_cents,
        billing_interval: "month".to_string(),
        features: vec![],
    }
}

pub fn sample_profile(user_id: Uuid) -> InstructorProfile {
    InstructorProfile {
        user_id,
        display_name: "Ana Souza".to_string(),
        headline: Some("Dados & ML".to_string()),
        bio: None,
        updated_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Router wiring over fakes
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub accounts: Arc<FakeAccounts>,
    pub chat: Arc<FakeChat>,
    pub instructor: Arc<FakeInstructor>,
    pub plans: Arc<FakePlans>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            accounts: FakeAccounts::with(AccountBehavior::Ok(UserType::Student, json!({}))),
            chat: FakeChat::with(ChatBehavior::Ok(ChatUsage {
                used: 0,
                limit: 500,
                renews_at: Utc::now(),
            })),
            instructor: FakeInstructor::with(InstructorBehavior::Ok(sample_profile(
                Uuid::new_v4(),
            ))),
            plans: FakePlans::with(PlanBehavior::Ok(vec![])),
        }
    }

    pub fn router(&self) -> Router {
        app::router(AppState {
            resolver: Arc::new(SessionResolver::new(TEST_SECRET)),
            accounts: self.accounts.clone() as Arc<dyn AccountService>,
            chat: self.chat.clone() as Arc<dyn ChatUsageService>,
            instructor: self.instructor.clone() as Arc<dyn InstructorProfileService>,
            plans: self.plans.clone() as Arc<dyn PlanStore>,
            health: HealthMonitor::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// One-shot request helpers
// ---------------------------------------------------------------------------

pub async fn get(router: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).expect("request builds");
    send(router, request).await
}

pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request builds");
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, body)
}
