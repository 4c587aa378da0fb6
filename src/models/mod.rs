pub mod research;
pub mod session;
pub mod user;
