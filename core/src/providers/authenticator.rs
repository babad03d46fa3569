//! Authenticator trait.

use crate::error::Result;
use crate::model::Identity;
use std::future::Future;

/// Bearer-credential verification.
///
/// Token *issuance* is someone else's job; this trait is only the consumed
/// side of the contract: a bearer string resolves to an [`Identity`] or it
/// does not.
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Token unknown or expired → `CommerceError::InvalidToken`
    /// - Backing store unavailable → `CommerceError::Database`
    fn authenticate(&self, bearer: &str) -> impl Future<Output = Result<Identity>> + Send;
}
