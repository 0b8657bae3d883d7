use anyhow::{anyhow, Result};
use std::{collections::HashMap, sync::RwLock};

use super::KeyValueStore;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .map
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .map
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self
            .map
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        guard.remove(key);
        Ok(())
    }
}
