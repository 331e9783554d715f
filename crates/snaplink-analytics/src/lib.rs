//! Analytics over the slug store.
//!
//! [`aggregate`] is a pure function of a record snapshot and an
//! [`AnalyticsQuery`]: it filters, sorts and paginates the snapshot and
//! computes summaries over the unfiltered set. [`AnalyticsService`] pulls the
//! snapshot from a read-only store and runs the pipeline.

pub mod error;
pub mod pipeline;
pub mod query;
pub mod service;

pub use error::AnalyticsError;
pub use pipeline::{aggregate, AnalyticsReport, ChartPoint, PageInfo};
pub use query::{AnalyticsQuery, SortDirection, SortKey};
pub use service::{AnalyticsService, LinkAnalytics};
