// Common module - shared types and utilities for the store

pub mod config;
pub mod db;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod migrations;

// Re-export commonly used types for convenience
pub use config::{ConfigError, StoreConfig};
pub use db::connect_pool;
pub use error::{AdapterError, AdapterResult};
pub use helpers::{safe_email_log, safe_token_log};
pub use id_generator::generate_user_id;
