use crate::error::RegistryError;
use crate::slug::Slug;
use crate::store::LinkRecord;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, RegistryError>;

/// Parameters for creating a short link.
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// The URL to shorten.
    pub destination_url: String,
    /// Optional caller-chosen slug. Empty strings count as absent.
    pub custom_slug: Option<String>,
}

impl CreateParams {
    pub fn generated(destination_url: impl Into<String>) -> Self {
        Self {
            destination_url: destination_url.into(),
            custom_slug: None,
        }
    }

    pub fn custom(destination_url: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            destination_url: destination_url.into(),
            custom_slug: Some(slug.into()),
        }
    }
}

/// A successfully persisted short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub record: LinkRecord,
    /// Path the slug resolves under, e.g. `/demo`.
    pub short_url_path: String,
}

impl CreatedLink {
    pub fn slug(&self) -> &Slug {
        &self.record.slug
    }
}

#[async_trait]
pub trait SlugRegistry: Send + Sync + 'static {
    /// Allocates a slug and persists a new record.
    ///
    /// Returns only once the store has committed the record.
    async fn create(&self, params: CreateParams) -> Result<CreatedLink>;

    /// Resolves a slug for redirection, recording one click.
    ///
    /// The returned record already includes the click.
    async fn resolve(&self, slug: &str) -> Result<LinkRecord>;

    /// Reads a record without recording a click.
    async fn lookup(&self, slug: &str) -> Result<LinkRecord>;
}
