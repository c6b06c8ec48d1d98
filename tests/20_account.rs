mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{AccountBehavior, FakeAccounts, TestApp};
use mentoria_api::session::UserType;

#[tokio::test]
async fn sync_returns_role_and_profile_in_the_envelope() {
    let mut app = TestApp::new();
    let profile = json!({ "userId": "abc", "displayName": "Ana Souza" });
    app.accounts = FakeAccounts::with(AccountBehavior::Ok(UserType::Instructor, profile.clone()));
    let router = app.router();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) = common::post_json(
        &router,
        "/api/account/sync?userType=instructor",
        Some(&token),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "role": "instructor", "profile": profile })
    );
    assert_eq!(app.accounts.call_count(), 1);
    assert_eq!(
        *app.accounts.last_requested.lock().expect("lock"),
        Some(UserType::Instructor)
    );
}

#[tokio::test]
async fn sync_without_user_type_passes_none_to_the_delegate() {
    let app = TestApp::new();
    let router = app.router();
    let token = common::token_for(Uuid::new_v4());

    let (status, _body) =
        common::post_json(&router, "/api/account/sync", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.accounts.last_requested.lock().expect("lock"), None);
}

#[tokio::test]
async fn identity_failure_maps_to_401() {
    let mut app = TestApp::new();
    app.accounts = FakeAccounts::with(AccountBehavior::IdentityFailure);
    let router = app.router();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) =
        common::post_json(&router, "/api/account/sync", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Falha ao sincronizar conta" }));
}

#[tokio::test]
async fn storage_failure_maps_to_500() {
    let mut app = TestApp::new();
    app.accounts = FakeAccounts::with(AccountBehavior::StorageFailure);
    let router = app.router();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) =
        common::post_json(&router, "/api/account/sync", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Erro ao sincronizar conta" }));
}
