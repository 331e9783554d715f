mod analytics;
mod error;
mod health;
mod links;

pub use analytics::AnalyticsParams;
pub use error::ErrorResponse;
pub use health::HealthResponse;
pub use links::{CreateLinkRequest, CreateLinkResponse};
