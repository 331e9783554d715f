use serde::Deserialize;
use snaplink_analytics::{AnalyticsQuery, SortDirection, SortKey};

/// Query string of `GET /api/analytics`; absent fields take the query defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub search: Option<String>,
    pub sort_key: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl From<AnalyticsParams> for AnalyticsQuery {
    fn from(params: AnalyticsParams) -> Self {
        let defaults = AnalyticsQuery::default();
        AnalyticsQuery {
            search: params.search.unwrap_or(defaults.search),
            sort_key: params.sort_key.unwrap_or(defaults.sort_key),
            sort_direction: params.sort_direction.unwrap_or(defaults.sort_direction),
            page: params.page.unwrap_or(defaults.page),
            page_size: params.page_size.unwrap_or(defaults.page_size),
        }
    }
}
