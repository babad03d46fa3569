//! Mock authenticator for testing.

use crate::error::{CommerceError, Result};
use crate::mocks::poisoned;
use crate::model::{Identity, Role, UserId};
use crate::providers::Authenticator;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock authenticator resolving tokens from an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MockAuthenticator {
    tokens: Arc<Mutex<HashMap<String, Identity>>>,
}

impl MockAuthenticator {
    /// Create an empty mock authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for an identity.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    pub fn grant(&self, token: &str, identity: Identity) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), identity);
    }

    /// Register a fresh regular-user token and return the identity.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    pub fn grant_user(&self, token: &str) -> Identity {
        let identity = Identity {
            user_id: UserId::new(),
            role: Role::Regular,
        };
        self.grant(token, identity);
        identity
    }

    /// Register a fresh admin token and return the identity.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    pub fn grant_admin(&self, token: &str) -> Identity {
        let identity = Identity {
            user_id: UserId::new(),
            role: Role::Admin,
        };
        self.grant(token, identity);
        identity
    }
}

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, bearer: &str) -> impl Future<Output = Result<Identity>> + Send {
        let tokens = Arc::clone(&self.tokens);
        let bearer = bearer.to_string();

        async move {
            tokens
                .lock()
                .map_err(|_| poisoned())?
                .get(&bearer)
                .copied()
                .ok_or(CommerceError::InvalidToken)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grant_and_authenticate() {
        let auth = MockAuthenticator::new();
        let identity = auth.grant_admin("secret");

        let resolved = auth.authenticate("secret").await.expect("known token");
        assert_eq!(resolved, identity);

        assert_eq!(
            auth.authenticate("other").await,
            Err(CommerceError::InvalidToken)
        );
    }
}
