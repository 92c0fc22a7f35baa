use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const BASIC_AUTH_TOKEN: &str = "bW9jay1jbGllbnQ6bW9jay1zZWNyZXQ=";
pub const USER: &str = "integration";
pub const PASSWORD: &str = "secret";

pub const GET_ENDPOINTS: [&str; 5] = [
    "deductions",
    "purchases",
    "service_types",
    "dirf_infos",
    "dirf_additional_infos",
];
pub const POST_ENDPOINTS: [&str; 4] = [
    "employees",
    "employees_occupations",
    "occupations",
    "service_tickets",
];

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub user: String,
    pub password: String,
    pub user_type: String,
}

/// Body returned by a successful `/auth` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: u16,
    pub message: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub token: String,
    pub companies: String,
    pub companies_codes: String,
    pub companies_names: String,
}

#[derive(Default)]
struct Inner {
    auth_calls: AtomicUsize,
    tokens: RwLock<HashSet<String>>,
}

/// Shared server state. Cloning shares the same counters and tokens.
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State that already accepts `token` as a bearer token.
    pub fn with_token(token: &str) -> Self {
        let mut tokens = HashSet::new();
        tokens.insert(token.to_string());
        Self {
            inner: Arc::new(Inner {
                auth_calls: AtomicUsize::new(0),
                tokens: RwLock::new(tokens),
            }),
        }
    }

    /// Number of `/auth` requests served, successful or not.
    pub fn auth_calls(&self) -> usize {
        self.inner.auth_calls.load(Ordering::SeqCst)
    }

    pub async fn token_count(&self) -> usize {
        self.inner.tokens.read().await.len()
    }

    async fn is_valid(&self, token: &str) -> bool {
        self.inner.tokens.read().await.contains(token)
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/auth", post(authenticate))
        .route("/{endpoint}", get(query_endpoint).post(submit_endpoint))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"status": status.as_u16(), "message": message})),
    )
}

async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AuthRequest>,
) -> (StatusCode, Json<Value>) {
    state.inner.auth_calls.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Basic {BASIC_AUTH_TOKEN}");
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid basic auth token");
    }

    // Wrong user or password is reported in the body, not the HTTP status.
    if input.user != USER || input.password != PASSWORD {
        debug!(user = %input.user, "rejected credentials");
        return (
            StatusCode::OK,
            Json(json!({"status": 401, "message": "Invalid user or password"})),
        );
    }

    let token = Uuid::new_v4().to_string();
    state.inner.tokens.write().await.insert(token.clone());
    info!(user_type = %input.user_type, "issued token");

    let body = AuthResponse {
        status: 200,
        message: "Authorized".to_string(),
        token_type: "bearer".to_string(),
        token,
        companies: "1,2".to_string(),
        companies_codes: "100,200".to_string(),
        companies_names: "Matriz,Filial".to_string(),
    };
    (StatusCode::OK, Json(json!(body)))
}

async fn check_bearer(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if state.is_valid(token).await => Ok(()),
        _ => Err(error_body(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}

async fn query_endpoint(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !GET_ENDPOINTS.contains(&endpoint.as_str()) {
        return Err(error_body(StatusCode::NOT_FOUND, "Not found"));
    }
    check_bearer(&state, &headers).await?;
    Ok(Json(json!({"endpoint": endpoint, "query": params})))
}

async fn submit_endpoint(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if !POST_ENDPOINTS.contains(&endpoint.as_str()) {
        return Err(error_body(StatusCode::NOT_FOUND, "Not found"));
    }
    check_bearer(&state, &headers).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"endpoint": endpoint, "received": body})),
    ))
}
