// handlers/elevated/users.rs - GET /users and PATCH /users/admin/:id handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::user::admin_role_set;
use crate::database::{Collection, Document, Filter, UpdateResult};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let users = state.store.find(Collection::Users, &Filter::all()).await?;
    Ok(Json(users))
}

/// PATCH /users/admin/:id - Give a user the admin role. There is no demotion.
pub async fn promote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .store
        .update_one(Collection::Users, &Filter::by_id(id), admin_role_set())
        .await?;

    tracing::info!(
        "Promote {}: matched {}, modified {}",
        id,
        result.matched_count,
        result.modified_count
    );
    Ok(Json(result))
}
