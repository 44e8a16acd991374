//! SQLite implementation of the adapter contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use super::models::{
    Account, AccountKey, NewUser, PurgeReport, Session, SessionAndUser, UpdateSession, UpdateUser,
    User, VerificationToken, VerificationTokenKey,
};
use super::store::AuthAdapter;
use crate::common::{
    generate_user_id, safe_email_log, safe_token_log, AdapterError, AdapterResult,
};

const USER_COLUMNS: &str = "id, name, email, email_verified, image";
const SESSION_COLUMNS: &str = "session_token, user_id, expires";
const ACCOUNT_COLUMNS: &str = "user_id, type, provider, provider_account_id, refresh_token, \
     access_token, expires_at, token_type, scope, id_token, session_state";
const VERIFICATION_COLUMNS: &str = "identifier, token, expires";

/// Flat row of the session/user join
#[derive(FromRow)]
struct SessionUserRow {
    session_token: String,
    user_id: String,
    expires: DateTime<Utc>,
    u_id: String,
    u_name: Option<String>,
    u_email: String,
    u_email_verified: Option<DateTime<Utc>>,
    u_image: Option<String>,
}

impl From<SessionUserRow> for SessionAndUser {
    fn from(row: SessionUserRow) -> Self {
        SessionAndUser {
            session: Session {
                session_token: row.session_token,
                user_id: row.user_id,
                expires: row.expires,
            },
            user: User {
                id: row.u_id,
                name: row.u_name,
                email: row.u_email,
                email_verified: row.u_email_verified,
                image: row.u_image,
            },
        }
    }
}

/// Adapter backed by a SQLite pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    db_pool: SqlitePool,
}

impl SqliteAdapter {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    /// Delete sessions and verification tokens that expired before `now`
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AdapterResult<PurgeReport> {
        let sessions = sqlx::query("DELETE FROM sessions WHERE expires < ?")
            .bind(now)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        let verification_tokens = sqlx::query("DELETE FROM verification_tokens WHERE expires < ?")
            .bind(now)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        let report = PurgeReport {
            sessions,
            verification_tokens,
        };
        if sessions > 0 || verification_tokens > 0 {
            info!(
                sessions = report.sessions,
                verification_tokens = report.verification_tokens,
                "Purged expired rows"
            );
        }
        Ok(report)
    }
}

#[async_trait]
impl AuthAdapter for SqliteAdapter {
    async fn create_user(&self, user: NewUser) -> AdapterResult<User> {
        let id = user.id.unwrap_or_else(generate_user_id);

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&id)
        .bind(user.name)
        .bind(&user.email)
        .bind(user.email_verified)
        .bind(user.image)
        .fetch_one(&self.db_pool)
        .await?;

        info!(
            user_id = %created.id,
            email = %safe_email_log(&created.email),
            "User created"
        );
        Ok(created)
    }

    async fn get_user(&self, id: &str) -> AdapterResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        if user.is_none() {
            debug!(email = %safe_email_log(email), "No user for email");
        }
        Ok(user)
    }

    async fn create_session(&self, session: Session) -> AdapterResult<Session> {
        let created = sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO sessions ({SESSION_COLUMNS}) VALUES (?, ?, ?) RETURNING {SESSION_COLUMNS}"
        ))
        .bind(&session.session_token)
        .bind(&session.user_id)
        .bind(session.expires)
        .fetch_one(&self.db_pool)
        .await?;

        debug!(
            user_id = %created.user_id,
            session = %safe_token_log(&created.session_token),
            "Session created"
        );
        Ok(created)
    }

    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<SessionAndUser>> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT s.session_token, s.user_id, s.expires,
                   u.id AS u_id, u.name AS u_name, u.email AS u_email,
                   u.email_verified AS u_email_verified, u.image AS u_image
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.session_token = ?
            "#,
        )
        .bind(session_token)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(SessionAndUser::from))
    }

    async fn update_user(&self, user: UpdateUser) -> AdapterResult<User> {
        let id = user.id.clone().ok_or(AdapterError::MissingUserId)?;

        if !user.has_changes() {
            return self
                .get_user(&id)
                .await?
                .ok_or(AdapterError::UserNotFound(id));
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = user.name {
                set.push("name = ");
                set.push_bind_unseparated(name);
            }
            if let Some(email) = user.email {
                set.push("email = ");
                set.push_bind_unseparated(email);
            }
            if let Some(email_verified) = user.email_verified {
                set.push("email_verified = ");
                set.push_bind_unseparated(email_verified);
            }
            if let Some(image) = user.image {
                set.push("image = ");
                set.push_bind_unseparated(image);
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.clone());
        builder.push(format!(" RETURNING {USER_COLUMNS}"));

        let updated = builder
            .build_query_as::<User>()
            .fetch_optional(&self.db_pool)
            .await?;

        match updated {
            Some(updated) => {
                info!(user_id = %updated.id, "User updated");
                Ok(updated)
            }
            None => {
                warn!(user_id = %id, "Update for unknown user");
                Err(AdapterError::UserNotFound(id))
            }
        }
    }

    async fn update_session(&self, session: UpdateSession) -> AdapterResult<Option<Session>> {
        if !session.has_changes() {
            let existing = sqlx::query_as::<_, Session>(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE session_token = ?"
            ))
            .bind(&session.session_token)
            .fetch_optional(&self.db_pool)
            .await?;
            return Ok(existing);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE sessions SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(user_id) = session.user_id {
                set.push("user_id = ");
                set.push_bind_unseparated(user_id);
            }
            if let Some(expires) = session.expires {
                set.push("expires = ");
                set.push_bind_unseparated(expires);
            }
        }
        builder.push(" WHERE session_token = ");
        builder.push_bind(session.session_token.clone());
        builder.push(format!(" RETURNING {SESSION_COLUMNS}"));

        let updated = builder
            .build_query_as::<Session>()
            .fetch_optional(&self.db_pool)
            .await?;

        if updated.is_none() {
            debug!(
                session = %safe_token_log(&session.session_token),
                "Update for unknown session"
            );
        }
        Ok(updated)
    }

    async fn link_account(&self, account: Account) -> AdapterResult<Account> {
        let linked = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts ({ACCOUNT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.user_id)
        .bind(&account.account_type)
        .bind(&account.provider)
        .bind(&account.provider_account_id)
        .bind(account.refresh_token)
        .bind(account.access_token)
        .bind(account.expires_at)
        .bind(account.token_type)
        .bind(account.scope)
        .bind(account.id_token)
        .bind(account.session_state)
        .fetch_one(&self.db_pool)
        .await?;

        info!(
            user_id = %linked.user_id,
            provider = %linked.provider,
            "Account linked"
        );
        Ok(linked)
    }

    async fn get_user_by_account(&self, key: &AccountKey) -> AdapterResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.email_verified, u.image
            FROM users u
            INNER JOIN accounts a ON a.user_id = u.id
            WHERE a.provider = ? AND a.provider_account_id = ?
            "#,
        )
        .bind(&key.provider)
        .bind(&key.provider_account_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn delete_session(&self, session_token: &str) -> AdapterResult<Option<Session>> {
        let deleted = sqlx::query_as::<_, Session>(&format!(
            "DELETE FROM sessions WHERE session_token = ? RETURNING {SESSION_COLUMNS}"
        ))
        .bind(session_token)
        .fetch_optional(&self.db_pool)
        .await?;

        debug!(
            session = %safe_token_log(session_token),
            found = deleted.is_some(),
            "Session deleted"
        );
        Ok(deleted)
    }

    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> AdapterResult<VerificationToken> {
        let created = sqlx::query_as::<_, VerificationToken>(&format!(
            "INSERT INTO verification_tokens ({VERIFICATION_COLUMNS}) VALUES (?, ?, ?) \
             RETURNING {VERIFICATION_COLUMNS}"
        ))
        .bind(&token.identifier)
        .bind(&token.token)
        .bind(token.expires)
        .fetch_one(&self.db_pool)
        .await?;

        debug!(
            identifier = %safe_email_log(&created.identifier),
            "Verification token created"
        );
        Ok(created)
    }

    async fn use_verification_token(
        &self,
        key: &VerificationTokenKey,
    ) -> AdapterResult<Option<VerificationToken>> {
        let used = sqlx::query_as::<_, VerificationToken>(&format!(
            "DELETE FROM verification_tokens WHERE identifier = ? AND token = ? \
             RETURNING {VERIFICATION_COLUMNS}"
        ))
        .bind(&key.identifier)
        .bind(&key.token)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AdapterError::VerificationToken)?;

        debug!(
            identifier = %safe_email_log(&key.identifier),
            found = used.is_some(),
            "Verification token used"
        );
        Ok(used)
    }

    async fn delete_user(&self, id: &str) -> AdapterResult<Option<User>> {
        let deleted = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        if deleted.is_some() {
            info!(user_id = %id, "User deleted");
        }
        Ok(deleted)
    }

    async fn unlink_account(&self, key: &AccountKey) -> AdapterResult<()> {
        let result =
            sqlx::query("DELETE FROM accounts WHERE provider = ? AND provider_account_id = ?")
                .bind(&key.provider)
                .bind(&key.provider_account_id)
                .execute(&self.db_pool)
                .await?;

        debug!(
            provider = %key.provider,
            removed = result.rows_affected(),
            "Account unlinked"
        );
        Ok(())
    }
}
