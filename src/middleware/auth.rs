use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Verified token claims, inserted into request extensions by [`jwt_auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn email(&self) -> Option<&str> {
        self.0.email()
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).ok_or_else(|| {
        tracing::debug!("Rejected {}: missing bearer token", request.uri().path());
        ApiError::unauthorized()
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected {}: {}", request.uri().path(), e);
        ApiError::unauthorized()
    })?;

    request.extensions_mut().insert(AuthUser(claims));

    Ok(next.run(request).await)
}

/// Second whitespace-separated word of the Authorization header, e.g. `Bearer <token>`.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}
