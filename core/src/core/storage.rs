use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use enum_dispatch::enum_dispatch;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::model::ContextId;

/// Subscribers that fall further behind than this miss events and get `Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Key-value storage area shared by every catalog context attached to it,
/// the equivalent of a browser profile's local storage.
///
/// Every write is published as a [`StorageEvent`] to all subscribers,
/// tagged with the context that made it, so listeners can tell their own
/// writes apart from writes made elsewhere.
#[enum_dispatch(Storage)]
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str, source: ContextId) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str, source: ContextId) -> Result<(), StorageError>;
    fn keys(&self) -> Vec<String>;
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("error accessing storage file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file '{path}' is not a JSON object of strings")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage lock was poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// Context that wrote the key
    pub source: ContextId,
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum Storage {
    InMemoryStorage,
    LocalFileStorage,
}

/// State shared between clones of one storage area.
#[derive(Debug)]
struct Shared {
    items: Mutex<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl Shared {
    fn new(items: BTreeMap<String, String>) -> Shared {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Shared {
            items: Mutex::new(items),
            events,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.items.lock().map_err(|_| StorageError::Poisoned)
    }

    fn publish(&self, key: &str, source: ContextId) {
        // no subscribers is fine
        let _ = self.events.send(StorageEvent {
            key: key.to_owned(),
            source,
        });
    }

    fn keys(&self) -> Vec<String> {
        match self.items.lock() {
            Ok(items) => items.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Storage area that lives as long as the process. Clones share contents.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    shared: Arc<Shared>,
}

impl InMemoryStorage {
    pub fn new() -> InMemoryStorage {
        InMemoryStorage {
            shared: Arc::new(Shared::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageArea for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.shared.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str, source: ContextId) -> Result<(), StorageError> {
        self.shared
            .lock()?
            .insert(key.to_owned(), value.to_owned());
        self.shared.publish(key, source);
        Ok(())
    }

    fn remove_item(&self, key: &str, source: ContextId) -> Result<(), StorageError> {
        let removed = self.shared.lock()?.remove(key);
        if removed.is_some() {
            self.shared.publish(key, source);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.shared.keys()
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }
}

/// Storage area persisted as a single JSON object file.
///
/// Every write re-reads the file, applies the change and rewrites the whole
/// file, so processes sharing the file only overwrite the keys they write.
/// Reads are served from memory and see other processes' writes as of this
/// storage's last write (or open). There is no lock across processes: two
/// writes racing between read and rename still lose one of them.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    path: PathBuf,
    shared: Arc<Shared>,
}

impl LocalFileStorage {
    /// Opens the storage file at `path`, starting out empty if it does not exist yet.
    #[instrument(level = "debug")]
    pub fn open(path: PathBuf) -> Result<LocalFileStorage, StorageError> {
        let items = read_items(&path)?;
        Ok(LocalFileStorage {
            path,
            shared: Arc::new(Shared::new(items)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        let contents = serde_json::to_string(items).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        // write next to the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, contents).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Applies `change` to the current file contents and persists the result.
    /// The file is re-read first so keys written by another process since
    /// the last write survive. Memory is only updated once the file is
    /// written. Returns what `change` returned; `false` means nothing to write
    /// and memory just catches up with the file.
    fn write(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<bool, StorageError> {
        let mut items = self.shared.lock()?;
        let mut updated = read_items(&self.path)?;
        let changed = change(&mut updated);
        if changed {
            self.flush(&updated)?;
        }
        *items = updated;
        Ok(changed)
    }
}

fn read_items(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| StorageError::Format {
            path: path.to_owned(),
            source,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(%path, "storage file does not exist yet, starting empty");
            Ok(BTreeMap::new())
        }
        Err(source) => Err(StorageError::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

impl StorageArea for LocalFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.shared.lock()?.get(key).cloned())
    }

    #[instrument(skip(self, value), level = "debug")]
    fn set_item(&self, key: &str, value: &str, source: ContextId) -> Result<(), StorageError> {
        self.write(|items| {
            items.insert(key.to_owned(), value.to_owned());
            true
        })?;
        self.shared.publish(key, source);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn remove_item(&self, key: &str, source: ContextId) -> Result<(), StorageError> {
        if self.write(|items| items.remove(key).is_some())? {
            self.shared.publish(key, source);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.shared.keys()
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }
}
