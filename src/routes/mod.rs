pub mod error;
pub mod health;
pub mod research;
pub mod user;
