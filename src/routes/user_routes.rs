// src/routes/user_routes.rs

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value as JsonValue;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, EntityId, LoginRequest, LoginResponse, RegisterRequest, User},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.backend.users(&auth.authorization()).await?))
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let missing: Vec<&str> = [
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("phone_number", &req.phone_number),
        ("password", &req.password),
    ]
    .into_iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Missing required values: {}", missing.join(", "))))
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    validate_registration(&req)?;

    let created = state.backend.register_user(&req).await?;
    tracing::info!("user registered");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Pull `token` and `user_id` out of the backend's login answer.
fn read_login(body: &JsonValue) -> Option<LoginResponse> {
    let token = body.get("token")?.as_str()?.trim();
    if token.is_empty() {
        return None;
    }
    let user_id: EntityId = serde_json::from_value(body.get("user_id")?.clone()).ok()?;
    Some(LoginResponse {
        token: token.to_string(),
        user_id,
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.phone_number.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("phone_number and password are required"));
    }

    let body = state.backend.login(&req).await?;
    let session = read_login(&body).ok_or_else(ApiError::invalid_credentials)?;
    tracing::info!(user_id = %session.user_id, "login ok");
    Ok(Json(session))
}
