//! Local filesystem storage implementation.
//!
//! Keeps the whole catalog as one keyed JSON file:
//!
//! ```text
//! {root}/
//! └── products.json    # market_id → StoredProduct
//! ```
//!
//! Every upsert rewrites the file atomically (write to temp, then rename),
//! so a second crawl run racing this one can only ever observe a complete
//! snapshot, never a torn file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ProductRecord, StoredProduct};
use crate::storage::{ProductStore, UpsertOutcome};

const PRODUCTS_FILE: &str = "products.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the keyed product map, empty if nothing has been written yet.
    async fn load_products(&self) -> Result<BTreeMap<String, StoredProduct>> {
        Ok(self.read_json(PRODUCTS_FILE).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ProductStore for LocalStore {
    async fn upsert(&self, record: ProductRecord) -> Result<UpsertOutcome> {
        if record.market_id.is_empty() {
            return Err(AppError::storage("upsert with empty market_id"));
        }

        let mut products = self.load_products().await?;

        let outcome = match products.get_mut(&record.market_id) {
            Some(existing) => {
                existing.merge(record);
                UpsertOutcome::Updated
            }
            None => {
                let next_id = products.values().map(|p| p.id).max().unwrap_or(0) + 1;
                products.insert(
                    record.market_id.clone(),
                    StoredProduct::new(next_id, record),
                );
                UpsertOutcome::Inserted
            }
        };

        self.write_json(PRODUCTS_FILE, &products).await?;
        Ok(outcome)
    }

    async fn get(&self, market_id: &str) -> Result<Option<StoredProduct>> {
        let mut products = self.load_products().await?;
        Ok(products.remove(market_id))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.load_products().await?.len())
    }
}
