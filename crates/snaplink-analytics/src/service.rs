use crate::error::{AnalyticsError, Result};
use crate::pipeline::{aggregate, AnalyticsReport};
use crate::query::AnalyticsQuery;
use async_trait::async_trait;
use snaplink_core::ReadSlugStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait LinkAnalytics: Send + Sync + 'static {
    /// Builds a report from a fresh snapshot of the store.
    async fn report(&self, query: &AnalyticsQuery) -> Result<AnalyticsReport>;
}

/// Runs the aggregation pipeline over a read-only store.
///
/// Holds no state between calls; every report is re-derived from
/// `list_all`.
#[derive(Debug)]
pub struct AnalyticsService<S> {
    store: Arc<S>,
    store_timeout: Duration,
}

impl<S> Clone for AnalyticsService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            store_timeout: self.store_timeout,
        }
    }
}

impl<S: ReadSlugStore> AnalyticsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_timeout(store, DEFAULT_STORE_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<S>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }
}

#[async_trait]
impl<S: ReadSlugStore> LinkAnalytics for AnalyticsService<S> {
    async fn report(&self, query: &AnalyticsQuery) -> Result<AnalyticsReport> {
        let snapshot = tokio::time::timeout(self.store_timeout, self.store.list_all())
            .await
            .map_err(|_| {
                warn!(timeout = ?self.store_timeout, "snapshot read timed out");
                AnalyticsError::StoreTimeout
            })??;

        debug!(records = snapshot.len(), ?query, "aggregating analytics");
        Ok(aggregate(snapshot, query))
    }
}
