use crate::error::Result;
use crate::slug::Slug;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A link record as owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Primary key of the record.
    pub slug: Slug,
    /// The URL a resolve redirects to.
    pub destination_url: String,
    /// Set once by the store when the create commits.
    pub created_at: Timestamp,
    /// Number of successful resolves.
    pub clicks: u64,
}

/// Result of an atomic create-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The record was inserted with zero clicks.
    Created(LinkRecord),
    /// A record with the slug already exists; nothing was written.
    AlreadyExists,
}

/// A read-only view of a slug store.
///
/// The analytics aggregator only needs this half of the contract.
#[async_trait]
pub trait ReadSlugStore: Send + Sync + 'static {
    /// Retrieves the record for a given slug.
    /// Returns `None` if the slug does not exist.
    async fn get(&self, slug: &Slug) -> Result<Option<LinkRecord>>;

    /// Returns a snapshot of every record.
    ///
    /// No ordering is guaranteed by the contract; callers that need an order
    /// must impose one.
    async fn list_all(&self) -> Result<Vec<LinkRecord>>;
}

#[async_trait]
pub trait SlugStore: ReadSlugStore {
    /// Inserts a new record unless one already exists under `slug`.
    ///
    /// Of any number of concurrent calls for the same slug exactly one
    /// observes [`CreateOutcome::Created`].
    async fn try_create(&self, slug: &Slug, destination_url: &str) -> Result<CreateOutcome>;

    /// Atomically adds one click and returns the updated record.
    /// Returns `None` if the slug does not exist.
    async fn increment_clicks(&self, slug: &Slug) -> Result<Option<LinkRecord>>;
}
