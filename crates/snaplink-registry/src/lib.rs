//! Slug registry: allocates slugs, resolves them and records clicks.
//!
//! Core types are re-exported from `snaplink_core`.

pub mod service;
pub mod settings;

pub use service::RegistryService;
pub use settings::RegistrySettings;
pub use snaplink_core::{CreateParams, CreatedLink, RegistryError, SlugRegistry};
