//! PostgreSQL user directory.

use crate::db_err;
use sqlx::{PgPool, Postgres, QueryBuilder};
use stitch_core::error::{CommerceError, Result};
use stitch_core::model::{Role, UserId, UserSummary};
use stitch_core::providers::{Page, UserDirectory, UserQuery};

/// PostgreSQL user directory.
///
/// Back-office user management only; account creation and password handling
/// are the (external) account service's business.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Create a new PostgreSQL user directory.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PostgresUserDirectory {
    async fn list_users(&self, query: &UserQuery) -> Result<Page<UserSummary>> {
        let mut rows_query = QueryBuilder::<Postgres>::new(
            "SELECT id, name, email, phone, role, created_at FROM users WHERE 1=1",
        );
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE 1=1");

        if let Some(needle) = query.search.as_deref() {
            let pattern = format!("%{needle}%");
            for q in [&mut rows_query, &mut count_query] {
                q.push(" AND (name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        }

        rows_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let items: Vec<UserSummary> = rows_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list users", &e))?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count users", &e))?;

        Ok(Page::new(items, total, query.page))
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> Result<()> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id.0)
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update role", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::UserNotFound { user_id });
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete user", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::UserNotFound { user_id });
        }
        Ok(())
    }
}
