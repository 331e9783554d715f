use snaplink_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Clone, Error)]
pub enum AnalyticsError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("store snapshot timed out")]
    StoreTimeout,
}

impl AnalyticsError {
    pub fn is_retriable(&self) -> bool {
        match self {
            AnalyticsError::Storage(e) => e.is_transient(),
            AnalyticsError::StoreTimeout => true,
        }
    }
}
