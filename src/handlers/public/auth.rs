// handlers/public/auth.rs - POST /jwt handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::user::email_of;
use crate::database::Document;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /jwt - Sign the posted identity into a one-hour session token.
///
/// The body is an arbitrary JSON object that must carry a string `email`;
/// the response body is the bare token string.
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(identity) = payload?;
    if email_of(&identity).is_none() {
        return Err(ApiError::bad_request("Identity must include an email"));
    }

    state.tokens.issue(identity).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })
}
