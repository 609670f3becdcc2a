use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    catalog::storage_key::StorageKeys,
    core::storage::{Storage, StorageArea},
    model::{CatalogEvent, ContextId},
};

pub mod album;
pub mod asset;
pub mod entity;
mod error;
pub mod seed;
#[cfg(test)]
mod test;

pub use error::{CatalogError, CatalogResult};

/// Everything a store needs to reach its collections: the storage area,
/// the keys of this catalog, the context writes are attributed to and the
/// channel change notifications go out on.
#[derive(Debug, Clone)]
pub struct CatalogContext {
    pub storage: Storage,
    pub keys: StorageKeys,
    pub context_id: ContextId,
    pub events: broadcast::Sender<CatalogEvent>,
}

impl CatalogContext {
    /// `None` if nothing is stored under `key`.
    /// A value that does not parse is an error, not an empty collection.
    pub fn read_collection<T: DeserializeOwned>(&self, key: &str) -> CatalogResult<Option<Vec<T>>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };
        let items = serde_json::from_str(&raw).map_err(|source| CatalogError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        Ok(Some(items))
    }

    pub fn storage_has(&self, key: &str) -> CatalogResult<bool> {
        Ok(self.storage.get_item(key)?.is_some())
    }

    pub fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> CatalogResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| CatalogError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        debug!(key, len = items.len(), "writing collection");
        self.storage.set_item(key, &raw, self.context_id)?;
        Ok(())
    }

    pub fn notify(&self, event: CatalogEvent) {
        debug!(event = event.name(), "change notification");
        // nobody listening is fine
        let _ = self.events.send(event);
    }
}
