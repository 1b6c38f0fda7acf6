// src/backend.rs

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderValue, Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::models::{Appointment, Center, LoginRequest, NewService, RegisterRequest, Service, User};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// The external clinic API. Everything the portal shows comes from here.
#[async_trait]
pub trait ClinicBackend: Send + Sync {
    /// `/centers/`: used to scope appointments.
    async fn centers(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError>;
    /// `/clinics/`: used to scope services and the clinic list.
    async fn clinics(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError>;
    async fn appointments(&self, auth: &HeaderValue) -> Result<Vec<Appointment>, BackendError>;
    async fn users(&self, auth: &HeaderValue) -> Result<Vec<User>, BackendError>;
    async fn services(&self, auth: &HeaderValue) -> Result<Vec<Service>, BackendError>;

    async fn create_service(&self, auth: &HeaderValue, service: &NewService) -> Result<JsonValue, BackendError>;
    async fn update_service(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError>;
    async fn delete_service(&self, auth: &HeaderValue, id: &str) -> Result<(), BackendError>;

    async fn register_user(&self, req: &RegisterRequest) -> Result<JsonValue, BackendError>;
    async fn login(&self, req: &LoginRequest) -> Result<JsonValue, BackendError>;
    /// Clinic registration is a multipart form; body and content type go through as-is.
    async fn register_center(&self, content_type: Option<&HeaderValue>, body: Bytes) -> Result<JsonValue, BackendError>;

    async fn arv_availability(&self, auth: &HeaderValue, center: Option<&str>) -> Result<JsonValue, BackendError>;
    async fn create_arv(&self, auth: &HeaderValue, body: &JsonValue) -> Result<JsonValue, BackendError>;
    async fn update_arv(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError>;
}

/* ============================================================
   reqwest implementation
   ============================================================ */

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Backend paths always carry a trailing slash.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!(%method, %url, "backend request");
        self.client.request(method, url)
    }

    fn authed(&self, method: Method, path: &str, auth: &HeaderValue) -> reqwest::RequestBuilder {
        self.request(method, path).header(header::AUTHORIZATION, auth.clone())
    }

    async fn checked(req: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, BackendError> {
        let bytes = Self::checked(req).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClinicBackend for HttpBackend {
    async fn centers(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError> {
        Self::json(self.authed(Method::GET, "centers/", auth)).await
    }

    async fn clinics(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError> {
        Self::json(self.authed(Method::GET, "clinics/", auth)).await
    }

    async fn appointments(&self, auth: &HeaderValue) -> Result<Vec<Appointment>, BackendError> {
        Self::json(self.authed(Method::GET, "appointment/", auth)).await
    }

    async fn users(&self, auth: &HeaderValue) -> Result<Vec<User>, BackendError> {
        // backend answers null when there are no users
        let users: Option<Vec<User>> = Self::json(self.authed(Method::GET, "users/", auth)).await?;
        Ok(users.unwrap_or_default())
    }

    async fn services(&self, auth: &HeaderValue) -> Result<Vec<Service>, BackendError> {
        Self::json(self.authed(Method::GET, "services/", auth)).await
    }

    async fn create_service(&self, auth: &HeaderValue, service: &NewService) -> Result<JsonValue, BackendError> {
        Self::json(self.authed(Method::POST, "services/", auth).json(service)).await
    }

    async fn update_service(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError> {
        Self::json(self.authed(Method::PUT, &format!("services/{id}/"), auth).json(body)).await
    }

    async fn delete_service(&self, auth: &HeaderValue, id: &str) -> Result<(), BackendError> {
        Self::checked(self.authed(Method::DELETE, &format!("services/{id}/"), auth)).await?;
        Ok(())
    }

    async fn register_user(&self, req: &RegisterRequest) -> Result<JsonValue, BackendError> {
        Self::json(self.request(Method::POST, "register/").json(req)).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<JsonValue, BackendError> {
        Self::json(self.request(Method::POST, "login/").json(req)).await
    }

    async fn register_center(&self, content_type: Option<&HeaderValue>, body: Bytes) -> Result<JsonValue, BackendError> {
        let mut req = self.request(Method::POST, "centers/").body(body);
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct.clone());
        }
        Self::json(req).await
    }

    async fn arv_availability(&self, auth: &HeaderValue, center: Option<&str>) -> Result<JsonValue, BackendError> {
        let mut req = self.authed(Method::GET, "arvavailability/", auth);
        if let Some(center) = center {
            req = req.query(&[("center", center)]);
        }
        Self::json(req).await
    }

    async fn create_arv(&self, auth: &HeaderValue, body: &JsonValue) -> Result<JsonValue, BackendError> {
        Self::json(self.authed(Method::POST, "arvavailability/", auth).json(body)).await
    }

    async fn update_arv(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError> {
        Self::json(self.authed(Method::PUT, &format!("arvavailability/{id}/"), auth).json(body)).await
    }
}

/* ============================================================
   In-memory backend for route tests
   ============================================================ */

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    pub struct FakeBackend {
        pub centers: Vec<Center>,
        pub appointments: Vec<Appointment>,
        pub users: Vec<User>,
        pub services: Vec<Service>,
        pub arv: Vec<JsonValue>,
        /// When set, every call fails with this upstream status.
        pub fail_with: Option<u16>,
        /// `"<call> <authorization>"` per call, in order.
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn record(&self, call: &str, auth: Option<&HeaderValue>) -> Result<(), BackendError> {
            let auth = auth.and_then(|v| v.to_str().ok()).unwrap_or("-");
            self.calls.lock().unwrap().push(format!("{call} {auth}"));
            match self.fail_with {
                Some(status) => Err(BackendError::Status {
                    status,
                    detail: "fake failure".into(),
                }),
                None => Ok(()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClinicBackend for FakeBackend {
        async fn centers(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError> {
            self.record("centers", Some(auth))?;
            Ok(self.centers.clone())
        }

        async fn clinics(&self, auth: &HeaderValue) -> Result<Vec<Center>, BackendError> {
            self.record("clinics", Some(auth))?;
            Ok(self.centers.clone())
        }

        async fn appointments(&self, auth: &HeaderValue) -> Result<Vec<Appointment>, BackendError> {
            self.record("appointments", Some(auth))?;
            Ok(self.appointments.clone())
        }

        async fn users(&self, auth: &HeaderValue) -> Result<Vec<User>, BackendError> {
            self.record("users", Some(auth))?;
            Ok(self.users.clone())
        }

        async fn services(&self, auth: &HeaderValue) -> Result<Vec<Service>, BackendError> {
            self.record("services", Some(auth))?;
            Ok(self.services.clone())
        }

        async fn create_service(&self, auth: &HeaderValue, service: &NewService) -> Result<JsonValue, BackendError> {
            self.record("create_service", Some(auth))?;
            let mut body = serde_json::to_value(service).map_err(|e| BackendError::Decode(e.to_string()))?;
            body["service_id"] = json!("new-1");
            Ok(body)
        }

        async fn update_service(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError> {
            self.record(&format!("update_service:{id}"), Some(auth))?;
            Ok(body.clone())
        }

        async fn delete_service(&self, auth: &HeaderValue, id: &str) -> Result<(), BackendError> {
            self.record(&format!("delete_service:{id}"), Some(auth))
        }

        async fn register_user(&self, req: &RegisterRequest) -> Result<JsonValue, BackendError> {
            self.record("register_user", None)?;
            Ok(json!({ "user_id": 77, "first_name": req.first_name }))
        }

        async fn login(&self, req: &LoginRequest) -> Result<JsonValue, BackendError> {
            self.record("login", None)?;
            if req.password == "correct horse" {
                Ok(json!({ "token": "tok-1", "user_id": 9 }))
            } else {
                Ok(json!({ "detail": "invalid" }))
            }
        }

        async fn register_center(&self, content_type: Option<&HeaderValue>, body: Bytes) -> Result<JsonValue, BackendError> {
            self.record("register_center", content_type)?;
            Ok(json!({ "center_id": 5, "bytes": body.len() }))
        }

        async fn arv_availability(&self, auth: &HeaderValue, center: Option<&str>) -> Result<JsonValue, BackendError> {
            self.record(&format!("arv:{}", center.unwrap_or("*")), Some(auth))?;
            let rows: Vec<JsonValue> = self
                .arv
                .iter()
                .filter(|r| center.is_none_or(|c| r["center"].to_string().trim_matches('"') == c))
                .cloned()
                .collect();
            Ok(JsonValue::Array(rows))
        }

        async fn create_arv(&self, auth: &HeaderValue, body: &JsonValue) -> Result<JsonValue, BackendError> {
            self.record("create_arv", Some(auth))?;
            Ok(body.clone())
        }

        async fn update_arv(&self, auth: &HeaderValue, id: &str, body: &JsonValue) -> Result<JsonValue, BackendError> {
            self.record(&format!("update_arv:{id}"), Some(auth))?;
            Ok(body.clone())
        }
    }
}
