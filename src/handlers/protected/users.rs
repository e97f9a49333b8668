// handlers/protected/users.rs - GET /users/admin/:email handler

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::database::models::user::{is_admin, EMAIL_FIELD};
use crate::database::{Collection, Filter};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminStatus {
    pub admin: bool,
}

/// GET /users/admin/:email - Whether the caller's own account is an admin.
///
/// Asking about any email other than the token's own answers `admin: false`
/// without touching storage.
pub async fn check_admin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, ApiError> {
    if auth_user.email() != Some(email.as_str()) {
        return Ok(Json(AdminStatus { admin: false }));
    }

    let user = state
        .store
        .find_one(Collection::Users, &Filter::eq(EMAIL_FIELD, email))
        .await?;

    Ok(Json(AdminStatus {
        admin: is_admin(user.as_ref()),
    }))
}
