// src/routes/dashboard_routes.rs

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Local;
use serde::Deserialize;

use crate::{
    engine::{
        DashboardView,
        time_range::{Period, parse_anchor},
    },
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::AppState,
    routes::appointment_routes::clinic_appointments,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Daily | Weekly | Monthly
    pub mode: Option<String>,
    /// YYYY-MM-DD, or YYYY-MM in monthly mode
    pub anchor: Option<String>,
    /// Restrict the monthly series to one year
    pub year: Option<i32>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let mode: Period = match q.mode.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::validation)?,
        None => Period::default(),
    };
    let anchor = match q.anchor.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_anchor(raw)
            .ok_or_else(|| ApiError::validation("anchor must be YYYY-MM-DD or YYYY-MM"))?,
        None => Local::now().date_naive(),
    };

    let authz = auth.authorization();
    let (appointments, users) = tokio::try_join!(
        clinic_appointments(&state, &auth),
        async { Ok::<_, ApiError>(state.backend.users(&authz).await?) },
    )?;

    Ok(Json(DashboardView::build(&appointments, &users, mode, anchor, q.year)))
}
