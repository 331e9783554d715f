use crate::query::{AnalyticsQuery, SortDirection, SortKey};
use serde::Serialize;
use snaplink_core::{LinkRecord, Slug};
use std::cmp::Ordering;

/// Number of records in [`AnalyticsReport::top_records`].
pub const TOP_RECORDS: usize = 5;
/// Number of points in [`AnalyticsReport::chart_series`].
pub const CHART_POINTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    /// Pages available for the filtered set; 0 when nothing matched.
    pub total_pages: usize,
    /// Records that passed the search filter.
    pub total_items: usize,
}

/// One bar of the recent-links chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub slug: Slug,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// The requested page of the filtered, sorted listing.
    pub records: Vec<LinkRecord>,
    /// Every record in the store, regardless of search.
    pub total_count: usize,
    pub total_clicks: u64,
    /// Most clicked records; ties go to the older record.
    pub top_records: Vec<LinkRecord>,
    /// Clicks of the most recently created records, newest first.
    pub chart_series: Vec<ChartPoint>,
    pub page_info: PageInfo,
}

/// Builds the full analytics view from a record snapshot.
///
/// The snapshot may arrive in any order. Summaries ignore the search, sort
/// and page parameters.
pub fn aggregate(mut records: Vec<LinkRecord>, query: &AnalyticsQuery) -> AnalyticsReport {
    records.sort_by_key(|record| record.created_at);

    let mut listing = filter(&records, &query.search);
    sort(&mut listing, query.sort_key, query.sort_direction);
    let (page, page_info) = paginate(
        &listing,
        query.effective_page(),
        query.effective_page_size(),
    );

    AnalyticsReport {
        records: page.iter().map(|record| (*record).clone()).collect(),
        total_count: records.len(),
        total_clicks: total_clicks(&records),
        top_records: top_records(&records, TOP_RECORDS),
        chart_series: chart_series(&records, CHART_POINTS),
        page_info,
    }
}

/// Keeps records whose destination or slug contains `search`, ignoring case.
pub fn filter<'a>(records: &'a [LinkRecord], search: &str) -> Vec<&'a LinkRecord> {
    if search.is_empty() {
        return records.iter().collect();
    }

    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.destination_url.to_lowercase().contains(&needle)
                || record.slug.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

fn compare(a: &LinkRecord, b: &LinkRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::DestinationUrl => a.destination_url.cmp(&b.destination_url),
        SortKey::Slug => a.slug.cmp(&b.slug),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Clicks => a.clicks.cmp(&b.clicks),
    }
}

/// Stable sort; descending flips the comparison, so equal keys keep their
/// incoming order in both directions.
pub fn sort(records: &mut [&LinkRecord], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Asc => records.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Desc => records.sort_by(|a, b| compare(b, a, key)),
    }
}

/// Cuts one 1-indexed page out of `records`. Pages past the end are empty.
pub fn paginate<'r, 'a>(
    records: &'r [&'a LinkRecord],
    page: usize,
    page_size: usize,
) -> (&'r [&'a LinkRecord], PageInfo) {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = records.len();

    let start = (page - 1).saturating_mul(page_size);
    let slice = if start >= total_items {
        &records[total_items..]
    } else {
        let end = start.saturating_add(page_size).min(total_items);
        &records[start..end]
    };

    (
        slice,
        PageInfo {
            page,
            page_size,
            total_pages: total_items.div_ceil(page_size),
            total_items,
        },
    )
}

pub fn total_clicks(records: &[LinkRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |sum, record| sum.saturating_add(record.clicks))
}

/// `records` must be in creation order.
pub fn top_records(records: &[LinkRecord], n: usize) -> Vec<LinkRecord> {
    let mut ranked: Vec<&LinkRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    ranked.into_iter().take(n).cloned().collect()
}

/// `records` must be in creation order.
pub fn chart_series(records: &[LinkRecord], n: usize) -> Vec<ChartPoint> {
    records
        .iter()
        .rev()
        .take(n)
        .map(|record| ChartPoint {
            slug: record.slug.clone(),
            clicks: record.clicks,
        })
        .collect()
}
