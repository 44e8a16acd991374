//! Auth session store
//!
//! Maps the auth framework's adapter contract (users, sessions, OAuth
//! account links and email verification tokens) onto SQLite tables.

pub mod adapter;
pub mod common;

pub use adapter::{AuthAdapter, SqliteAdapter};
pub use common::{AdapterError, AdapterResult, StoreConfig};
