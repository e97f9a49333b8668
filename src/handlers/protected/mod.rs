// handlers/protected/mod.rs - Handlers behind token verification
//
// Each handler receives the verified caller as an `AuthUser` extractor and
// scopes its reads to the caller's own email.

pub mod carts;
pub mod users;
