pub const DEFAULT_NAMESPACE: &str = "kavian";

/// Written with the current time to tell other contexts that something changed.
pub const LAST_UPDATE: &str = "lastUpdate";

pub fn assets(namespace: &str) -> String {
    format!("{}_assets", namespace)
}

pub fn albums(namespace: &str) -> String {
    format!("{}_albums", namespace)
}

/// Keys one catalog uses. Catalogs with different namespaces can share a
/// storage area without seeing each other's collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub assets: String,
    pub albums: String,
}

impl StorageKeys {
    pub fn for_namespace(namespace: &str) -> StorageKeys {
        StorageKeys {
            assets: assets(namespace),
            albums: albums(namespace),
        }
    }

    pub fn is_collection_key(&self, key: &str) -> bool {
        key == self.assets || key == self.albums
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys::for_namespace(DEFAULT_NAMESPACE)
    }
}
