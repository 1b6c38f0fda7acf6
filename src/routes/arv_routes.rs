// src/routes/arv_routes.rs
//
// ARV (antiretroviral) stock availability per clinic.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::{error::ApiError, middleware::auth_context::AuthContext, models::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/arvavailability", get(list_arv).post(create_arv))
        .route("/arvavailability/", get(list_arv).post(create_arv))
        .route("/arvavailability/{arv_id}", put(update_arv))
        .route("/arvavailability/{arv_id}/", put(update_arv))
}

#[derive(Debug, Deserialize)]
pub struct ArvQuery {
    pub center: Option<String>,
}

pub async fn list_arv(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<ArvQuery>,
) -> Result<Json<JsonValue>, ApiError> {
    let center = q.center.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let rows = state
        .backend
        .arv_availability(&auth.authorization(), center)
        .await?;
    Ok(Json(rows))
}

pub async fn create_arv(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<JsonValue>,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    let created = state.backend.create_arv(&auth.authorization(), &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_arv(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(arv_id): Path<String>,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, ApiError> {
    let updated = state
        .backend
        .update_arv(&auth.authorization(), &arv_id, &body)
        .await?;
    Ok(Json(updated))
}
