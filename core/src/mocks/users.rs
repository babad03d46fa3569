//! Mock user directory for testing.

use crate::error::{CommerceError, Result};
use crate::mocks::poisoned;
use crate::model::{Role, UserId, UserSummary};
use crate::providers::{Page, UserDirectory, UserQuery};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user directory.
#[derive(Debug, Clone, Default)]
pub struct MockUserDirectory {
    users: Arc<Mutex<HashMap<UserId, UserSummary>>>,
}

impl MockUserDirectory {
    /// Create an empty mock directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the user map.
    pub(crate) fn users_handle(&self) -> Arc<Mutex<HashMap<UserId, UserSummary>>> {
        Arc::clone(&self.users)
    }

    /// Seed a user directly.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    pub fn insert_user(&self, user: UserSummary) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

impl UserDirectory for MockUserDirectory {
    fn list_users(&self, query: &UserQuery) -> impl Future<Output = Result<Page<UserSummary>>> + Send {
        let users = Arc::clone(&self.users);
        let query = query.clone();

        async move {
            let users = users.lock().map_err(|_| poisoned())?;
            let mut matched: Vec<UserSummary> = users
                .values()
                .filter(|u| {
                    query.search.as_deref().is_none_or(|needle| {
                        let needle = needle.to_lowercase();
                        u.name.to_lowercase().contains(&needle)
                            || u.email.to_lowercase().contains(&needle)
                    })
                })
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let total = matched.len() as i64;
            let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
            let items: Vec<UserSummary> = matched
                .into_iter()
                .skip(offset)
                .take(query.page.limit as usize)
                .collect();
            Ok(Page::new(items, total, query.page))
        }
    }

    fn update_role(&self, user_id: UserId, role: Role) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            let mut users = users.lock().map_err(|_| poisoned())?;
            let user = users
                .get_mut(&user_id)
                .ok_or(CommerceError::UserNotFound { user_id })?;
            user.role = role;
            Ok(())
        }
    }

    fn delete_user(&self, user_id: UserId) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            users
                .lock()
                .map_err(|_| poisoned())?
                .remove(&user_id)
                .map(|_| ())
                .ok_or(CommerceError::UserNotFound { user_id })
        }
    }
}
