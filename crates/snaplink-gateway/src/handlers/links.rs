use crate::error::{AppError, Result};
use crate::model::{CreateLinkRequest, CreateLinkResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use snaplink_core::{CreateParams, LinkRecord};
use tracing::{debug, info};

pub async fn create_link_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateLinkResponse>)> {
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let params = CreateParams {
        destination_url: request.destination_url,
        custom_slug: request.custom_slug,
    };

    let created = state.registry().create(params).await?;
    info!(slug = %created.slug(), "created link");

    let short_url = created.slug().to_url(state.base_url());
    let response = CreateLinkResponse {
        short_url,
        short_url_path: created.short_url_path,
        slug: created.record.slug.to_string(),
        destination_url: created.record.destination_url,
        created_at: created.record.created_at,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Counts the click, then redirects.
pub async fn resolve_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect> {
    let record = state.registry().resolve(&slug).await?;
    debug!(%slug, clicks = record.clicks, "resolved link");
    Ok(Redirect::temporary(&record.destination_url))
}

/// Reads a record without counting a click.
pub async fn get_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkRecord>> {
    let record = state.registry().lookup(&slug).await?;
    Ok(Json(record))
}
