use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod arv_routes;
pub mod clinic_routes;
pub mod dashboard_routes;
pub mod service_routes;
pub mod user_routes;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(user_routes::router())
        .merge(clinic_routes::router())
        .merge(service_routes::router())
        .merge(arv_routes::router())
        .merge(appointment_routes::router())
        .merge(dashboard_routes::router());

    Router::new().nest("/api", api).with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use http_body_util::BodyExt;
    use serde_json::Value as JsonValue;

    use crate::backend::fake::FakeBackend;
    use crate::models::{AppState, Center};

    pub const TOKEN: &str = "Token tok-1";
    pub const CLINICIAN: &str = "9";

    pub fn app(backend: Arc<FakeBackend>) -> Router {
        super::router(AppState {
            backend,
            page_size: 5,
        })
    }

    pub fn centers() -> Vec<Center> {
        serde_json::from_value(serde_json::json!([
            { "center_id": "c1", "user": 9, "center_name": "Kisumu East" },
            { "center_id": "c2", "user": 8, "center_name": "Nakuru West" }
        ]))
        .unwrap()
    }

    pub fn request(method: &str, uri: &str, token: Option<&str>, user: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", t);
        }
        if let Some(u) = user {
            builder = builder.header("X-User-ID", u);
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub fn authed_get(uri: &str) -> Request<Body> {
        request("GET", uri, Some(TOKEN), Some(CLINICIAN), None)
    }

    pub async fn body_json(response: Response<Body>) -> JsonValue {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
