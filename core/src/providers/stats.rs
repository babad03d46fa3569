//! Dashboard statistics trait.

use crate::error::Result;
use crate::model::DashboardStats;
use std::future::Future;

/// Back-office dashboard aggregates.
pub trait StatsProvider: Send + Sync {
    /// Compute the dashboard numbers.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn dashboard(&self) -> impl Future<Output = Result<DashboardStats>> + Send;
}
