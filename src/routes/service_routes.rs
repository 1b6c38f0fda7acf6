// src/routes/service_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde_json::Value as JsonValue;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, NewService, Service, SuccessResponse, owned_center_ids},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/{service_id}", put(update_service).delete(delete_service))
}

/// Services offered by the caller's clinics.
pub async fn list_services(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Service>>, ApiError> {
    let user_id = auth.require_user_id()?;
    let authz = auth.authorization();

    let clinics = state.backend.clinics(&authz).await?;
    let owned = owned_center_ids(&clinics, user_id);
    if owned.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let services = state.backend.services(&authz).await?;
    Ok(Json(
        services
            .into_iter()
            .filter(|s| s.center_id.as_ref().is_some_and(|c| owned.contains(&c)))
            .collect(),
    ))
}

fn validate_new_service(req: &NewService) -> Result<(), ApiError> {
    let missing = req.service_name.trim().is_empty()
        || req.status.trim().is_empty()
        || req.description.trim().is_empty()
        || req.center_id.is_none();
    if missing {
        return Err(ApiError::validation(
            "Missing required values: service_name, status, description, center_id",
        ));
    }
    Ok(())
}

pub async fn create_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewService>,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    validate_new_service(&req)?;

    let created = state.backend.create_service(&auth.authorization(), &req).await?;
    tracing::info!(service = %req.service_name, "service created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(service_id): Path<String>,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, ApiError> {
    let updated = state
        .backend
        .update_service(&auth.authorization(), &service_id, &body)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(service_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .backend
        .delete_service(&auth.authorization(), &service_id)
        .await?;
    tracing::info!(%service_id, "service deleted");
    Ok(Json(SuccessResponse { success: true }))
}
