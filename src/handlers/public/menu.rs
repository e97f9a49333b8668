// handlers/public/menu.rs - GET /menu handler

use axum::{extract::State, Json};

use crate::database::{Collection, Document, Filter};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let items = state.store.find(Collection::Menu, &Filter::all()).await?;
    Ok(Json(items))
}
