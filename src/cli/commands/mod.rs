pub mod health;
pub mod promote;
pub mod token;
