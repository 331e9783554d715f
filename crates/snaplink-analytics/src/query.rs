use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

/// Record field the listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DestinationUrl,
    Slug,
    #[default]
    CreatedAt,
    Clicks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Everything that shapes an analytics view.
///
/// Defaults: no search, newest first, page 1 of 5 records.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct AnalyticsQuery {
    /// Case-insensitive substring matched against destination and slug.
    #[builder(default, setter(into))]
    pub search: String,
    #[builder(default)]
    pub sort_key: SortKey,
    #[builder(default)]
    pub sort_direction: SortDirection,
    /// 1-indexed; 0 is treated as 1.
    #[builder(default = 1)]
    pub page: usize,
    /// Clamped to `1..=MAX_PAGE_SIZE`.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

impl AnalyticsQuery {
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}
