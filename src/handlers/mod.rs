// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (token verified) → Elevated (token verified + admin role)
pub mod elevated;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a storage-native id taken from a request path.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw)))
}
