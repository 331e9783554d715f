//! Core types and traits for the snaplink URL shortener.
//!
//! This crate provides the link record model, the slug type, the store
//! contract consumed by the registry and the analytics aggregator, and the
//! shared error taxonomy.

pub mod clock;
pub mod error;
pub mod registry;
pub mod slug;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{ErrorKind, RegistryError, StorageError};
pub use registry::{CreateParams, CreatedLink, SlugRegistry};
pub use slug::Slug;
pub use store::{CreateOutcome, LinkRecord, ReadSlugStore, SlugStore};
