//! Storage abstractions for product persistence.
//!
//! One upsert call per transformed record, keyed on the marketplace item id.
//! The backend resolves repeat sightings with a field-subset merge, never a
//! full replace, so re-running a crawl is safe.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ProductRecord, StoredProduct};

// Re-export for convenience
pub use local::LocalStore;

/// What an upsert did to the keyed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First sighting: a fresh row was inserted
    Inserted,
    /// Repeat sighting: the mutable field subset was merged
    Updated,
}

/// Trait for product storage backends.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert or merge a record, keyed by its marketplace id.
    ///
    /// Must be idempotent: applying the same record twice yields one row,
    /// with only the updated-at timestamp changed.
    async fn upsert(&self, record: ProductRecord) -> Result<UpsertOutcome>;

    /// Look up a stored row by marketplace id.
    async fn get(&self, market_id: &str) -> Result<Option<StoredProduct>>;

    /// Number of stored rows.
    async fn count(&self) -> Result<usize>;
}
