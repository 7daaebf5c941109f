mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use reqwest::Client;
use serde_json::{Value, json};

use common::{PROVIDER_ID, StubProvider};
use openid_login_backend::core::registry::ProviderRegistry;
use openid_login_backend::domain::entities::accounts::{UserAccount, UserProfile};
use openid_login_backend::repositories::accounts::{AccountRepository, InMemoryAccountRepository};
use openid_login_backend::routes::configure_all_routes;
use openid_login_backend::services::auth::{
    LoginService, OpenIdClient, PendingLoginStore, RequestContext,
};

async fn login_service(stub: &StubProvider, accounts: Arc<InMemoryAccountRepository>) -> LoginService {
    let client = OpenIdClient::load(
        &stub.config_source(),
        PROVIDER_ID,
        Client::new(),
        &RequestContext::background(),
    )
    .await
    .unwrap();

    let mut registry = ProviderRegistry::new();
    registry.insert(client);

    LoginService::new(
        registry,
        PendingLoginStore::new(chrono::Duration::minutes(10)),
        accounts,
        32,
    )
}

fn callback_uri(code: &str, state: &str) -> String {
    format!(
        "/api/v1/login/{}/callback?code={}&state={}",
        PROVIDER_ID,
        urlencoding::encode(code),
        urlencoding::encode(state)
    )
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .configure(configure_all_routes),
        )
        .await
    };
}

macro_rules! begin_login {
    ($app:expr) => {{
        let request = test::TestRequest::get()
            .uri(&format!("/api/v1/login/{}", PROVIDER_ID))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, request).await;
        body["state"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_health_lists_loaded_providers() {
    let stub = StubProvider::start().await;
    let app = app!(login_service(&stub, Arc::new(InMemoryAccountRepository::new())).await);

    let request = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], json!([PROVIDER_ID]));
}

#[actix_web::test]
async fn test_begin_login_returns_url_with_state() {
    let stub = StubProvider::start().await;
    let app = app!(login_service(&stub, Arc::new(InMemoryAccountRepository::new())).await);

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/login/{}", PROVIDER_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    let login_url = body["login_url"].as_str().unwrap();
    let state = body["state"].as_str().unwrap();
    assert!(login_url.starts_with(&format!("{}/authorize?", stub.issuer())));
    assert!(login_url.contains(&format!("state={}", urlencoding::encode(state))));
}

#[actix_web::test]
async fn test_callback_creates_then_updates_account() {
    let stub = StubProvider::start().await;
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let app = app!(login_service(&stub, accounts.clone()).await);

    let state = begin_login!(app);
    stub.issue_login("first", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("first", &state))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;

    assert_eq!(body["subject"], "abc123");
    assert_eq!(body["provider"], PROVIDER_ID);
    assert_eq!(body["created"], true);
    assert_eq!(body["enrolled"], true);
    assert_eq!(body["profile"]["email"], "jane@example.com");

    stub.set_userinfo(json!({"sub": "abc123", "nickname": "jane"}));
    let state = begin_login!(app);
    stub.issue_login("second", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("second", &state))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["created"], false);
    assert_eq!(body["profile"]["nickname"], "jane");
    assert_eq!(body["profile"]["email"], "jane@example.com");
    assert_eq!(accounts.count().await, 1);
}

#[actix_web::test]
async fn test_state_is_single_use_and_must_match() {
    let stub = StubProvider::start().await;
    let app = app!(login_service(&stub, Arc::new(InMemoryAccountRepository::new())).await);

    let state = begin_login!(app);
    stub.issue_login("first", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("first", &state))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::OK);

    // 재사용된 state
    stub.issue_login("replay", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("replay", &state))
        .to_request();
    assert_eq!(
        test::call_service(&app, request).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // 발급한 적 없는 state
    let request = test::TestRequest::get()
        .uri(&callback_uri("replay", "forged-state"))
        .to_request();
    assert_eq!(
        test::call_service(&app, request).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_callback_error_responses() {
    let stub = StubProvider::start().await;
    let app = app!(login_service(&stub, Arc::new(InMemoryAccountRepository::new())).await);

    let denied = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/login/{}/callback?error=access_denied&state=s",
            PROVIDER_ID
        ))
        .to_request();
    assert_eq!(
        test::call_service(&app, denied).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let missing_code = test::TestRequest::get()
        .uri(&format!("/api/v1/login/{}/callback?state=s", PROVIDER_ID))
        .to_request();
    assert_eq!(
        test::call_service(&app, missing_code).await.status(),
        StatusCode::BAD_REQUEST
    );

    let unknown_provider = test::TestRequest::get()
        .uri("/api/v1/login/unknown")
        .to_request();
    assert_eq!(
        test::call_service(&app, unknown_provider).await.status(),
        StatusCode::NOT_FOUND
    );

    // 교환에 실패한 코드
    let state = begin_login!(app);
    let bad_code = test::TestRequest::get()
        .uri(&callback_uri("never-issued", &state))
        .to_request();
    assert_eq!(
        test::call_service(&app, bad_code).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_profile_subject_mismatch_is_rejected() {
    let stub = StubProvider::start().await;
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let app = app!(login_service(&stub, accounts.clone()).await);
    stub.set_userinfo(json!({"sub": "someone-else", "email": "evil@example.com"}));

    let state = begin_login!(app);
    stub.issue_login("code", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("code", &state))
        .to_request();

    assert_eq!(
        test::call_service(&app, request).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(accounts.count().await, 0);
}

#[actix_web::test]
async fn test_userinfo_failure_falls_back_to_id_token_claims() {
    let stub = StubProvider::start().await;
    let app = app!(login_service(&stub, Arc::new(InMemoryAccountRepository::new())).await);
    stub.set_userinfo(json!({"email": "no-subject@example.com"}));

    let state = begin_login!(app);
    stub.issue_login("code", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("code", &state))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["subject"], "abc123");
    assert_eq!(body["profile"]["email"], "jane@example.com");
    assert_eq!(body["profile"]["given_name"], "Jane");
}

#[actix_web::test]
async fn test_email_taken_by_other_account_is_conflict() {
    let stub = StubProvider::start().await;
    let accounts = Arc::new(InMemoryAccountRepository::new());
    accounts
        .insert(UserAccount::new(
            "other",
            "existing-user",
            UserProfile {
                email: Some("jane@example.com".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap();
    let app = app!(login_service(&stub, accounts.clone()).await);

    let state = begin_login!(app);
    stub.issue_login("code", "abc123");
    let request = test::TestRequest::get()
        .uri(&callback_uri("code", &state))
        .to_request();

    assert_eq!(
        test::call_service(&app, request).await.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(accounts.count().await, 1);
}
