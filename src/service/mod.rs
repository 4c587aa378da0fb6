pub mod auth;
pub mod password;
pub mod seed;
pub mod session;
