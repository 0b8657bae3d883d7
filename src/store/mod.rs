// src/store/mod.rs

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{error::DatasetError, grid::Grid};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the most recent upload lives.
pub const DATASET_KEY: &str = "dataset";

/// A string key-value slot, the way browser local storage behaves: `set`
/// replaces the whole value, readers never see a partial write.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed access to the single persisted `Grid`.
pub struct DatasetStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> DatasetStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Replace the stored dataset wholesale.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = grid.rows().len()))]
    pub fn save(&self, grid: &Grid) -> Result<()> {
        let json = serde_json::to_string(grid).context("serializing dataset")?;
        self.backend
            .set(DATASET_KEY, &json)
            .context("writing dataset to store")?;
        info!(rows = grid.rows().len(), "dataset saved");
        Ok(())
    }

    /// The stored dataset, or `None` if nothing was uploaded. A stored value
    /// that is not a valid grid is logged and treated as absent.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn load(&self) -> Result<Option<Grid>> {
        let Some(raw) = self
            .backend
            .get(DATASET_KEY)
            .context("reading dataset from store")?
        else {
            return Ok(None);
        };
        match serde_json::from_str::<Grid>(&raw) {
            Ok(grid) => Ok(Some(grid)),
            Err(e) => {
                warn!(error = %e, "stored dataset is not valid JSON; ignoring it");
                Ok(None)
            }
        }
    }

    /// Like `load`, but a missing dataset is `NoDataset`.
    pub fn require(&self) -> Result<Grid> {
        self.load()?.ok_or_else(|| DatasetError::NoDataset.into())
    }

    pub fn clear(&self) -> Result<()> {
        self.backend
            .remove(DATASET_KEY)
            .context("clearing dataset from store")
    }
}
