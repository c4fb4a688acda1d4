//! In memory storage

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mycoin_common::database::{validate_storage_key, Error, SessionStorage};
use tokio::sync::RwLock;

/// Storage scoped to the lifetime of the value
///
/// Clones share the same underlying map, the way tabs of one browser session
/// would share `sessionStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create new [`MemoryStorage`]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        validate_storage_key(key)?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        validate_storage_key(key)?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        validate_storage_key(key)?;
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Storage for contexts without a storage medium
///
/// Every call fails with [`Error::Unavailable`], like session storage during a
/// non-interactive render pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SessionStorage for DetachedStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Err(Error::Unavailable)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
        Err(Error::Unavailable)
    }

    async fn remove(&self, _key: &str) -> Result<(), Error> {
        Err(Error::Unavailable)
    }
}
