//! Background purge of expired sessions and verification tokens

use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::error;

use super::sqlite::SqliteAdapter;

/// Spawn a task that purges expired rows every `period`.
/// The first purge runs immediately.
pub fn start_purge_task(adapter: SqliteAdapter, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = adapter.purge_expired(Utc::now()).await {
                error!(error = %e, "Failed to purge expired rows");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AuthAdapter, NewUser, Session};
    use crate::common::db::connect_memory_pool;
    use crate::common::migrations::run_migrations;

    async fn session_count(adapter: &SqliteAdapter) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(adapter.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_purge_task_removes_expired_rows() {
        let pool = connect_memory_pool().await.unwrap();
        run_migrations(&pool, false).await.unwrap();
        let adapter = SqliteAdapter::new(pool);

        let user = adapter
            .create_user(NewUser {
                email: "purge@example.com".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        for (token, offset) in [("expired", -1), ("active", 1)] {
            adapter
                .create_session(Session {
                    session_token: token.to_string(),
                    user_id: user.id.clone(),
                    expires: Utc::now() + chrono::Duration::hours(offset),
                })
                .await
                .unwrap();
        }
        assert_eq!(session_count(&adapter).await, 2);

        let handle = start_purge_task(adapter.clone(), Duration::from_millis(20));

        // First tick fires immediately; allow the task time to run
        let mut remaining = session_count(&adapter).await;
        for _ in 0..100 {
            if remaining == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            remaining = session_count(&adapter).await;
        }
        handle.abort();

        assert_eq!(remaining, 1);
        assert!(adapter.get_session_and_user("active").await.unwrap().is_some());
        assert!(adapter.get_session_and_user("expired").await.unwrap().is_none());
    }
}
