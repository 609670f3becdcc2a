use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, warn, Instrument};

use crate::{
    core::storage::{Storage, StorageArea},
    model::{CatalogEvent, ContextId},
};

use super::storage_key::StorageKeys;

/// Forwards writes to the catalog's collection keys made by *other*
/// contexts as `AssetsUpdated` notifications on this context's channel.
/// Writes made by this context are not forwarded, its stores notify
/// directly.
///
/// The listener runs as a tokio task until the handle is stopped or dropped.
#[derive(Debug)]
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Must be called from within a tokio runtime. The storage subscription
    /// is taken before returning, so every write after this call is seen.
    pub fn start(
        storage: &Storage,
        keys: StorageKeys,
        context_id: ContextId,
        events: broadcast::Sender<CatalogEvent>,
    ) -> SyncHandle {
        let mut storage_events = storage.subscribe();
        let span = tracing::debug_span!("catalog sync", context = %context_id);
        let task = tokio::spawn(
            async move {
                loop {
                    match storage_events.recv().await {
                        Ok(event) => {
                            if event.source == context_id || !keys.is_collection_key(&event.key) {
                                continue;
                            }
                            debug!(key = %event.key, source = %event.source, "collection changed elsewhere");
                            let _ = events.send(CatalogEvent::AssetsUpdated(None));
                        }
                        Err(RecvError::Lagged(missed)) => {
                            // something changed, we just don't know what
                            warn!(missed, "sync listener lagged behind storage events");
                            let _ = events.send(CatalogEvent::AssetsUpdated(None));
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
            .instrument(span),
        );
        SyncHandle { task }
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
