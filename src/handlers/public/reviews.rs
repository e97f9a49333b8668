// handlers/public/reviews.rs - GET /reviews handler

use axum::{extract::State, Json};

use crate::database::{Collection, Document, Filter};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let reviews = state.store.find(Collection::Reviews, &Filter::all()).await?;
    Ok(Json(reviews))
}
