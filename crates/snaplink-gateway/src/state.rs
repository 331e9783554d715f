use std::sync::Arc;

use snaplink_analytics::LinkAnalytics;
use snaplink_core::SlugRegistry;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<dyn SlugRegistry>,
    analytics: Arc<dyn LinkAnalytics>,
    base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn SlugRegistry>,
        analytics: Arc<dyn LinkAnalytics>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            analytics,
            base_url: Arc::from(public_base_url.into()),
        }
    }

    pub fn registry(&self) -> &dyn SlugRegistry {
        self.registry.as_ref()
    }

    pub fn analytics(&self) -> &dyn LinkAnalytics {
        self.analytics.as_ref()
    }

    /// Public origin used to build absolute short URLs.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
