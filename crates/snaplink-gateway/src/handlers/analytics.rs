use crate::error::{AppError, Result};
use crate::model::AnalyticsParams;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use snaplink_analytics::{AnalyticsQuery, AnalyticsReport};

pub async fn analytics_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<AnalyticsParams>, QueryRejection>,
) -> Result<Json<AnalyticsReport>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = AnalyticsQuery::from(params);

    let report = state.analytics().report(&query).await?;
    Ok(Json(report))
}
