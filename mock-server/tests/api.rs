use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, AppState, AuthResponse, BASIC_AUTH_TOKEN, PASSWORD, USER};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn auth_request(basic: &str, user: &str, password: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/auth")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Basic {basic}"))
        .body(format!(
            r#"{{"user":"{user}","password":"{password}","user_type":"external"}}"#
        ))
        .unwrap()
}

fn bearer_get(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn bearer_post(uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn auth_issues_token_with_joined_company_lists() {
    let state = AppState::new();
    let resp = app_with_state(state.clone())
        .oneshot(auth_request(BASIC_AUTH_TOKEN, USER, PASSWORD))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: AuthResponse = body_json(resp).await;
    assert_eq!(body.status, 200);
    assert_eq!(body.token_type, "bearer");
    assert!(!body.token.is_empty());
    assert_eq!(body.companies, "1,2");
    assert_eq!(state.auth_calls(), 1);
    assert_eq!(state.token_count().await, 1);
}

#[tokio::test]
async fn auth_issues_a_new_token_each_time() {
    let state = AppState::new();
    let router = app_with_state(state.clone());
    let first: AuthResponse = body_json(
        router
            .clone()
            .oneshot(auth_request(BASIC_AUTH_TOKEN, USER, PASSWORD))
            .await
            .unwrap(),
    )
    .await;
    let second: AuthResponse = body_json(
        router
            .oneshot(auth_request(BASIC_AUTH_TOKEN, USER, PASSWORD))
            .await
            .unwrap(),
    )
    .await;

    assert_ne!(first.token, second.token);
    assert_eq!(state.auth_calls(), 2);
}

#[tokio::test]
async fn auth_wrong_basic_token_returns_401() {
    let resp = app()
        .oneshot(auth_request("wrong", USER, PASSWORD))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn auth_wrong_password_reports_status_in_body() {
    let state = AppState::new();
    let resp = app_with_state(state.clone())
        .oneshot(auth_request(BASIC_AUTH_TOKEN, USER, "nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 401);
    assert!(body.get("token").is_none());
    assert_eq!(state.token_count().await, 0);
}

#[tokio::test]
async fn auth_malformed_json_returns_422() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"user":"only"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- GET endpoints ---

#[tokio::test]
async fn get_endpoint_echoes_query() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_get("/deductions?reference=202301&type=loan", "tok"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["endpoint"], "deductions");
    assert_eq!(body["query"]["reference"], "202301");
    assert_eq!(body["query"]["type"], "loan");
}

#[tokio::test]
async fn get_endpoint_without_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/service_types")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_endpoint_with_unknown_token_returns_401() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_get("/service_types", "other"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_endpoint_returns_404() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_get("/payslips", "tok"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_only_endpoint_rejects_get() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_get("/employees", "tok"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- POST endpoints ---

#[tokio::test]
async fn post_endpoint_echoes_body() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_post(
            "/occupations",
            "tok",
            r#"{"code":"DEV","name":"Developer","description":"builds","points":3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["endpoint"], "occupations");
    assert_eq!(body["received"]["points"], 3);
}

#[tokio::test]
async fn post_endpoint_without_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/service_tickets")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body("{}".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_endpoint_rejects_invalid_json() {
    let resp = app_with_state(AppState::with_token("tok"))
        .oneshot(bearer_post("/employees", "tok", "not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!body_bytes(resp).await.is_empty());
}
