// handlers/protected/carts.rs - GET /carts?email= handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::user::EMAIL_FIELD;
use crate::database::{Collection, Document, Filter};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}

/// GET /carts?email= - Cart items owned by the caller.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    query: Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let Query(query) = query?;
    let Some(email) = query.email.filter(|e| !e.is_empty()) else {
        return Ok(Json(Vec::new()));
    };

    if auth_user.email() != Some(email.as_str()) {
        tracing::warn!(
            "Cart read for '{}' denied to '{}'",
            email,
            auth_user.email().unwrap_or("<no email>")
        );
        return Err(ApiError::forbidden("Forbidden access!"));
    }

    let items = state
        .store
        .find(Collection::Carts, &Filter::eq(EMAIL_FIELD, email))
        .await?;
    Ok(Json(items))
}
