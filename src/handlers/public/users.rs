// handlers/public/users.rs - POST /users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::database::models::user::{email_of, EMAIL_FIELD, ROLE_FIELD};
use crate::database::{Collection, Document, Filter, InsertOneResult, StoreError};
use crate::error::ApiError;
use crate::state::AppState;

pub const USER_EXISTS_MESSAGE: &str = "User already exists!";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Created(InsertOneResult),
    Exists { message: &'static str },
}

impl Registration {
    fn exists() -> Self {
        Registration::Exists {
            message: USER_EXISTS_MESSAGE,
        }
    }
}

/// POST /users - Register a user, once per email.
///
/// A repeated email is answered with a message instead of an insert. Any
/// client-supplied role is dropped; new users start with the default role.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Registration>, ApiError> {
    let Json(mut user) = payload?;
    let email = email_of(&user)
        .ok_or_else(|| ApiError::bad_request("User must include an email"))?
        .to_string();

    let existing = state
        .store
        .find_one(Collection::Users, &Filter::eq(EMAIL_FIELD, email.as_str()))
        .await?;
    if existing.is_some() {
        return Ok(Json(Registration::exists()));
    }

    user.remove(ROLE_FIELD);

    match state.store.insert_one(Collection::Users, user).await {
        Ok(result) => {
            tracing::info!("Registered user {}", email);
            Ok(Json(Registration::Created(result)))
        }
        // lost a concurrent registration race for the same email
        Err(StoreError::Duplicate { .. }) => Ok(Json(Registration::exists())),
        Err(e) => Err(e.into()),
    }
}
