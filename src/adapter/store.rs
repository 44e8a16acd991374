//! The adapter contract the auth framework calls into

use async_trait::async_trait;

use super::models::{
    Account, AccountKey, NewUser, Session, SessionAndUser, UpdateSession, UpdateUser, User,
    VerificationToken, VerificationTokenKey,
};
use crate::common::AdapterResult;

/// Storage operations required by the auth framework.
///
/// Every method is a single independent database call. Lookups return
/// `Ok(None)` when nothing matches.
#[async_trait]
pub trait AuthAdapter: Send + Sync {
    async fn create_user(&self, user: NewUser) -> AdapterResult<User>;

    async fn get_user(&self, id: &str) -> AdapterResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<User>>;

    async fn create_session(&self, session: Session) -> AdapterResult<Session>;

    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<SessionAndUser>>;

    /// Fails with `MissingUserId` when the patch carries no id.
    async fn update_user(&self, user: UpdateUser) -> AdapterResult<User>;

    async fn update_session(&self, session: UpdateSession) -> AdapterResult<Option<Session>>;

    async fn link_account(&self, account: Account) -> AdapterResult<Account>;

    async fn get_user_by_account(&self, key: &AccountKey) -> AdapterResult<Option<User>>;

    /// Returns the removed session, if there was one.
    async fn delete_session(&self, session_token: &str) -> AdapterResult<Option<Session>>;

    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> AdapterResult<VerificationToken>;

    /// Deletes and returns the token; a second call for the same key yields `None`.
    async fn use_verification_token(
        &self,
        key: &VerificationTokenKey,
    ) -> AdapterResult<Option<VerificationToken>>;

    /// Removes the user together with its accounts and sessions.
    async fn delete_user(&self, id: &str) -> AdapterResult<Option<User>>;

    async fn unlink_account(&self, key: &AccountKey) -> AdapterResult<()>;
}
