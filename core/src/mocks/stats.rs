//! Mock dashboard statistics provider for testing.

use crate::error::Result;
use crate::mocks::poisoned;
use crate::model::DashboardStats;
use crate::providers::StatsProvider;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock statistics provider returning a canned value.
#[derive(Debug, Clone)]
pub struct MockStatsProvider {
    stats: Arc<Mutex<DashboardStats>>,
}

impl MockStatsProvider {
    /// Create a provider reporting all-zero stats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DashboardStats {
                total_users: 0,
                total_products: 0,
                total_orders: 0,
                total_revenue: Decimal::ZERO,
                recent_orders: Vec::new(),
                low_stock_products: Vec::new(),
            })),
        }
    }

    /// Replace the canned stats.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    pub fn set(&self, stats: DashboardStats) {
        *self.stats.lock().unwrap() = stats;
    }
}

impl Default for MockStatsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsProvider for MockStatsProvider {
    fn dashboard(&self) -> impl Future<Output = Result<DashboardStats>> + Send {
        let stats = Arc::clone(&self.stats);

        async move { Ok(stats.lock().map_err(|_| poisoned())?.clone()) }
    }
}
