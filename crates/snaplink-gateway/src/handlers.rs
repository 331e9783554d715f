mod analytics;
mod health;
mod links;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use links::{create_link_handler, get_link_handler, resolve_handler};
