// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token issuance, registration, catalogue reads and cart writes.

pub mod auth;
pub mod carts;
pub mod health;
pub mod menu;
pub mod reviews;
pub mod users;
