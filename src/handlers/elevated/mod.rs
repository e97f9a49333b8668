// handlers/elevated/mod.rs - Handlers behind token verification and the admin role check

pub mod menu;
pub mod users;
