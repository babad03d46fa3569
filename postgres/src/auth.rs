//! PostgreSQL bearer-token verification.

use crate::db_err;
use sqlx::PgPool;
use stitch_core::error::{CommerceError, Result};
use stitch_core::model::{Identity, Role, UserId};
use stitch_core::providers::Authenticator;
use uuid::Uuid;

/// PostgreSQL-backed [`Authenticator`].
///
/// Bearer tokens are opaque UUIDs written to `api_sessions` by the external
/// token issuer; this side only verifies them against their expiry and
/// resolves the owning user's current role.
#[derive(Clone)]
pub struct PostgresAuthenticator {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    user_id: Uuid,
    role: Role,
}

impl PostgresAuthenticator {
    /// Create a new PostgreSQL authenticator.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Authenticator for PostgresAuthenticator {
    async fn authenticate(&self, bearer: &str) -> Result<Identity> {
        // A token that is not even a UUID cannot be in the table
        let token = Uuid::parse_str(bearer).map_err(|_| CommerceError::InvalidToken)?;

        let row: IdentityRow = sqlx::query_as(
            r"
            SELECT s.user_id, u.role
            FROM api_sessions s
            JOIN users u ON s.user_id = u.id
            WHERE s.token = $1 AND s.expires_at > NOW()
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to verify token", &e))?
        .ok_or(CommerceError::InvalidToken)?;

        Ok(Identity {
            user_id: UserId(row.user_id),
            role: row.role,
        })
    }
}
