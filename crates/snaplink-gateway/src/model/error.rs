use serde::Serialize;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `slug_taken`.
    pub error: &'static str,
    pub message: String,
    /// Whether the same request may succeed if repeated.
    pub retriable: bool,
}
