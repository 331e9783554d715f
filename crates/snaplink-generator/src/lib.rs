pub mod random;

pub use random::RandomGenerator;

use snaplink_core::Slug;

/// Trait for generating candidate slugs.
///
/// Implementations are pure generators that don't interact with storage.
/// Candidates are not guaranteed to be unique; the registry resolves
/// collisions against the store.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<Slug>;
    /// Generates a fresh candidate slug.
    fn generate(&self) -> Self::Output;
}
