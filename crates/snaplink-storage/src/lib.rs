//! Slug store backends.

pub mod memory;
pub mod mysql;

pub use memory::InMemorySlugStore;
pub use mysql::MySqlSlugStore;
pub use snaplink_core::store::{CreateOutcome, LinkRecord, ReadSlugStore, SlugStore};
pub use snaplink_core::StorageError;
