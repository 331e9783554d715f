use crate::error::RegistryError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// A validated slug, the primary key of a [`LinkRecord`][crate::LinkRecord].
///
/// Slugs must be 3-20 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

pub const MIN_LENGTH: usize = 3;
pub const MAX_LENGTH: usize = 20;

impl Slug {
    /// Creates a new `Slug` after validating the input.
    ///
    /// Valid slugs are 3-20 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(slug: impl Into<String>) -> Result<Self, RegistryError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    /// Creates a `Slug` without validation.
    ///
    /// Use this only for slugs produced by trusted internal sources
    /// (generators with a fixed alphabet, rows already in the store).
    pub fn new_unchecked(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Path under which the slug resolves, e.g. `/demo`.
    pub fn to_path(&self) -> String {
        format!("/{}", self.0)
    }

    /// Generates the full short URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(slug: &str) -> Result<(), RegistryError> {
        // Allowed characters are ASCII, so byte length equals char count.
        if slug.len() < MIN_LENGTH || slug.len() > MAX_LENGTH {
            return Err(RegistryError::InvalidSlugFormat(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                slug.chars().count()
            )));
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RegistryError::InvalidSlugFormat(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                slug
            )));
        }

        Ok(())
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Slug::new(raw).map_err(serde::de::Error::custom)
    }
}
