// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    engine::{
        AppointmentView,
        filter::{AppointmentQuery, Tab},
        paginate::Pagination,
        time_range::{DateRange, parse_query_date},
    },
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, Appointment, owned_center_ids},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointment", get(list_appointments))
        .route("/appointment/view", get(appointment_view))
}

/// Appointments booked at clinics the caller owns.
pub async fn clinic_appointments(state: &AppState, auth: &AuthContext) -> Result<Vec<Appointment>, ApiError> {
    let user_id = auth.require_user_id()?;
    let authz = auth.authorization();

    let centers = state.backend.centers(&authz).await?;
    let owned = owned_center_ids(&centers, user_id);
    if owned.is_empty() {
        tracing::debug!(%user_id, "caller owns no clinics");
        return Ok(Vec::new());
    }

    let appointments = state.backend.appointments(&authz).await?;
    Ok(appointments
        .into_iter()
        .filter(|a| a.center_id.as_ref().is_some_and(|c| owned.contains(&c)))
        .collect())
}

/* ============================================================
   GET /appointment
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(clinic_appointments(&state, &auth).await?))
}

/* ============================================================
   GET /appointment/view
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// Single day, YYYY-MM-DD. Ignored when start/end are given.
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub search: Option<String>,
    pub tab: Option<String>,
    pub page: Option<usize>,
}

fn parse_date_param(name: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    parse_query_date(raw).ok_or_else(|| ApiError::validation(format!("{name} must be YYYY-MM-DD")))
}

impl ViewQuery {
    fn range(&self, today: NaiveDate) -> Result<DateRange, ApiError> {
        let range = match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                DateRange::new(parse_date_param("start", start)?, parse_date_param("end", end)?)?
            }
            (Some(one), None) | (None, Some(one)) => DateRange::single_day(parse_date_param("start", one)?),
            (None, None) => match self.date.as_deref() {
                Some(date) => DateRange::single_day(parse_date_param("date", date)?),
                None => DateRange::single_day(today),
            },
        };
        Ok(range)
    }

    fn to_query(&self, today: NaiveDate) -> Result<AppointmentQuery, ApiError> {
        let tab: Tab = self
            .tab
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(ApiError::validation)?;

        Ok(AppointmentQuery::new(self.range(today)?)
            .with_search(self.search.clone().unwrap_or_default())
            .with_tab(tab)
            .with_page(self.page.unwrap_or(1)))
    }
}

pub async fn appointment_view(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<ViewQuery>,
) -> Result<Json<AppointmentView>, ApiError> {
    let today = Local::now().date_naive();
    let query = q.to_query(today)?;
    let authz = auth.authorization();

    let (appointments, users, services) = tokio::try_join!(
        clinic_appointments(&state, &auth),
        async { Ok::<_, ApiError>(state.backend.users(&authz).await?) },
        async { Ok::<_, ApiError>(state.backend.services(&authz).await?) },
    )?;

    let view = AppointmentView::build(
        &appointments,
        &users,
        &services,
        &query,
        Pagination::new(state.page_size),
        today,
    )?;
    Ok(Json(view))
}
