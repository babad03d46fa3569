//! User directory trait.

use crate::error::Result;
use crate::model::{Role, UserId, UserSummary};
use crate::providers::{Page, UserQuery};
use std::future::Future;

/// Back-office user management.
pub trait UserDirectory: Send + Sync {
    /// Paged user listing with optional name/email search.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_users(
        &self,
        query: &UserQuery,
    ) -> impl Future<Output = Result<Page<UserSummary>>> + Send;

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `CommerceError::UserNotFound`
    fn update_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `CommerceError::UserNotFound`
    fn delete_user(&self, user_id: UserId) -> impl Future<Output = Result<()>> + Send;
}
