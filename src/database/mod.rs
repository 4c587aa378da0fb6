pub mod postgres_repository;
pub mod research;
pub mod session;
pub mod user;
