// src/routes/clinic_routes.rs

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, Center, EntityId},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clinics", get(list_clinics))
        .route("/centers", get(check_clinic).post(register_clinic))
}

/* ============================================================
   GET /clinics
   ============================================================ */

pub async fn list_clinics(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Center>>, ApiError> {
    let user_id = auth.require_user_id()?;
    let clinics = state.backend.clinics(&auth.authorization()).await?;

    Ok(Json(
        clinics
            .into_iter()
            .filter(|c| c.user.as_ref() == Some(user_id))
            .collect(),
    ))
}

/* ============================================================
   GET /centers?userId=
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct CheckClinicQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckClinicResponse {
    #[serde(rename = "clinicExists")]
    pub clinic_exists: bool,
}

/// Has this clinician registered a clinic yet? Drives the post-login redirect.
pub async fn check_clinic(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<CheckClinicQuery>,
) -> Result<Json<CheckClinicResponse>, ApiError> {
    let user_id = q
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EntityId::from)
        .ok_or_else(|| ApiError::validation("Missing userId query parameter"))?;

    let centers = state.backend.centers(&auth.authorization()).await?;
    Ok(Json(CheckClinicResponse {
        clinic_exists: centers.iter().any(|c| c.user.as_ref() == Some(&user_id)),
    }))
}

/* ============================================================
   POST /centers
   ============================================================ */

/// Clinic registration form (multipart, with documents). Forwarded verbatim.
pub async fn register_clinic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::validation("Registration form is empty"));
    }

    let created = state
        .backend
        .register_center(headers.get(header::CONTENT_TYPE), body)
        .await?;
    tracing::info!("clinic registered");
    Ok((StatusCode::CREATED, Json(created)))
}
