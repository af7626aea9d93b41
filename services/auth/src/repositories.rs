//! Repositories for database operations

pub mod admin;

pub use admin::AdminRepository;
