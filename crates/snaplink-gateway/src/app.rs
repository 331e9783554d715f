use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics_handler, create_link_handler, get_link_handler, health_handler, resolve_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Static routes win over `/{slug}`, so `/health` is never treated as a slug.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/links", post(create_link_handler))
                    .route("/links/{slug}", get(get_link_handler))
                    .route("/analytics", get(analytics_handler)),
            )
            .route("/{slug}", get(resolve_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
