// handlers/elevated/menu.rs - POST /menu handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::{Collection, Document, InsertOneResult};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let Json(item) = payload?;
    let result = state.store.insert_one(Collection::Menu, item).await?;
    Ok(Json(result))
}
