use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::models::user::{is_admin, EMAIL_FIELD};
use crate::database::{Collection, Filter};
use crate::error::{ApiError, FORBIDDEN_MESSAGE};
use crate::state::AppState;

/// Middleware that admits only callers whose stored user record has the admin role.
/// Must be layered inside [`super::jwt_auth_middleware`].
pub async fn validate_admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
        tracing::error!("Admin validation ran without JWT authentication");
        ApiError::unauthorized()
    })?;

    let Some(email) = auth_user.email() else {
        tracing::warn!("Admin validation failed: token carries no email claim");
        return Err(ApiError::forbidden(FORBIDDEN_MESSAGE));
    };

    // One point read per request; storage failures propagate as 5xx
    let user = state
        .store
        .find_one(Collection::Users, &Filter::eq(EMAIL_FIELD, email))
        .await?;

    if !is_admin(user.as_ref()) {
        tracing::warn!("Admin validation failed: '{}' is not an admin", email);
        return Err(ApiError::forbidden(FORBIDDEN_MESSAGE));
    }

    tracing::debug!("Admin validation successful: {}", email);
    Ok(next.run(request).await)
}
