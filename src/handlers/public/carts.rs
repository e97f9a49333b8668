// handlers/public/carts.rs - POST /carts and DELETE /carts/:id handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::{Collection, DeleteResult, Document, Filter, InsertOneResult};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

/// POST /carts - Store a cart item as posted.
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let Json(item) = payload?;
    let result = state.store.insert_one(Collection::Carts, item).await?;
    Ok(Json(result))
}

/// DELETE /carts/:id - Remove one cart item; a missing id yields `deletedCount: 0`.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id = parse_id(&id)?;
    let result = state.store.delete_one(Collection::Carts, &Filter::by_id(id)).await?;
    Ok(Json(result))
}
