//! HTTP boundary for the slug registry and the analytics aggregator.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
