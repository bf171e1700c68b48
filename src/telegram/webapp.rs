use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::core::config;
use crate::telegram::init_data::UserId;
use crate::telegram::submit::AUTH_ENDPOINT;
use crate::telegram::verify::{self, VerifiedInitData};

// ============================================================================
// API TYPES
// ============================================================================

/// Body the Mini-App posts to `/auth/`
#[derive(Debug, Deserialize)]
pub struct AuthRequestBody {
    pub user_id: UserId,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Shared state of all endpoints
#[derive(Clone)]
pub struct AuthState {
    pub bot_token: String,
    pub max_age: Duration,
}

impl AuthState {
    pub fn from_env() -> Self {
        Self {
            bot_token: config::BOT_TOKEN.clone(),
            max_age: config::init_data::max_age(),
        }
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Errors are rendered as `{"message": ...}`, the shape the submitter reads
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Verifies the `Authorization` header of a request
fn authenticate(headers: &HeaderMap, state: &AuthState) -> Result<VerifiedInitData, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    verify::verify_authorization(header, &state.bot_token, state.max_age)
        .map_err(|e| ApiError::Unauthorized(format!("Authentication failed: {}", e)))
}

fn same_user(claimed: &UserId, signed: i64) -> bool {
    match claimed {
        UserId::Numeric(id) => *id == signed,
        UserId::Text(id) => id.trim().parse::<i64>() == Ok(signed),
    }
}

// ============================================================================
// ROUTER
// ============================================================================

fn cors_layer(front_site: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(config::server::DEV_ORIGIN)
        .chain(front_site)
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router with the auth endpoint and a health check
pub fn create_auth_router(state: AuthState, front_site: Option<&str>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(AUTH_ENDPOINT, post(handle_auth))
        .layer(cors_layer(front_site))
        .with_state(Arc::new(state))
}

/// Runs the auth endpoint until the process is stopped
pub async fn run_auth_server(port: u16, state: AuthState, front_site: Option<&str>) -> anyhow::Result<()> {
    let app = create_auth_router(state, front_site);

    let addr = format!("0.0.0.0:{}", port);
    log::info!("Starting auth endpoint on http://{}{}", addr, AUTH_ENDPOINT);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "minihack-auth"
    }))
}

/// POST /auth/ - verify init data and confirm the claimed user
async fn handle_auth(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    body: Result<Json<AuthRequestBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let verified = authenticate(&headers, &state)?;

    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if !same_user(&body.user_id, verified.user_id) {
        log::warn!(
            "user_id {} in body does not match signed user {}",
            body.user_id,
            verified.user_id
        );
        return Err(ApiError::BadRequest("user_id does not match init data".to_string()));
    }

    let username = verified.user.get("username").and_then(|v| v.as_str()).unwrap_or("-");
    log::info!("Authenticated user {} ({})", verified.user_id, username);

    Ok(Json(serde_json::json!({
        "message": "ok",
        "user_id": verified.user_id
    })))
}
