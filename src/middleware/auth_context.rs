use axum::extract::FromRequestParts;
use axum::http::HeaderValue;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::Authorization;

use crate::auth::Token;
use crate::error::ApiError;
use crate::models::{AppState, EntityId};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity as presented by the browser. The token itself is
/// validated by the backend; we only check it is well formed.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: Token,
    pub user_id: Option<EntityId>,
}

impl AuthContext {
    pub fn authorization(&self) -> HeaderValue {
        self.token.header_value()
    }

    /// Clinic-scoped routes need to know whose clinics to show.
    pub fn require_user_id(&self) -> Result<&EntityId, ApiError> {
        self.user_id.as_ref().ok_or_else(ApiError::missing_user_id)
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Extract Authorization: Token <key>
            let TypedHeader(authz): TypedHeader<Authorization<Token>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::unauthorized())?;

            let user_id = parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(EntityId::from);

            Ok(AuthContext {
                token: authz.0,
                user_id,
            })
        }
    }
}
