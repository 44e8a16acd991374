//! Auth data models
//!
//! Field names on the wire follow the auth framework's adapter contract
//! (`emailVerified`, `userId`, `providerAccountId`, ...). OAuth token fields
//! keep their snake_case names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::deserialize_double_option;

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

/// Payload for `create_user`. A user id is generated when none is given.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial user update
///
/// `None` leaves a column untouched. For nullable columns `Some(None)` clears
/// the stored value.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub name: Option<Option<String>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub email_verified: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub image: Option<Option<String>>,
}

impl UpdateUser {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.email_verified.is_some()
            || self.image.is_some()
    }
}

/// Session database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

/// Partial session update keyed by session token
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSession {
    pub session_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl UpdateSession {
    pub fn has_changes(&self) -> bool {
        self.user_id.is_some() || self.expires.is_some()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionAndUser {
    pub session: Session,
    pub user: User,
}

/// OAuth account link
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub account_type: String,
    pub provider: String,
    #[serde(rename = "providerAccountId")]
    pub provider_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
}

impl Account {
    pub fn key(&self) -> AccountKey {
        AccountKey {
            provider: self.provider.clone(),
            provider_account_id: self.provider_account_id.clone(),
        }
    }
}

/// Composite key of an account link
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    pub provider: String,
    pub provider_account_id: String,
}

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationToken {
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Composite key of a verification token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationTokenKey {
    pub identifier: String,
    pub token: String,
}

/// Row counts removed by `purge_expired`
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub sessions: u64,
    pub verification_tokens: u64,
}
