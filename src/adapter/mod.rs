//! # Adapter Module
//!
//! Persistence for the auth framework's storage contract:
//! - Users and OAuth account links
//! - Database sessions
//! - Single-use email verification tokens

pub mod maintenance;
pub mod models;
pub mod sqlite;
pub mod store;


pub use models::{
    Account, AccountKey, NewUser, PurgeReport, Session, SessionAndUser, UpdateSession, UpdateUser,
    User, VerificationToken, VerificationTokenKey,
};
pub use maintenance::start_purge_task;
pub use sqlite::SqliteAdapter;
pub use store::AuthAdapter;
