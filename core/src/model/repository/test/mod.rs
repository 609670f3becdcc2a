use tokio::sync::broadcast;

use crate::{
    catalog::storage_key::StorageKeys,
    core::storage::{InMemoryStorage, Storage},
    model::{CatalogEvent, ContextId},
};

use super::{album::AlbumStore, asset::AssetStore, CatalogContext};

pub mod album;

pub struct TestStores {
    pub storage: Storage,
    pub assets: AssetStore,
    pub albums: AlbumStore,
    pub events: broadcast::Receiver<CatalogEvent>,
}

/// Empty in-memory storage with stores attached under the default namespace
pub fn create_stores() -> TestStores {
    let storage: Storage = InMemoryStorage::new().into();
    let (events_tx, events) = broadcast::channel(64);
    let ctx = CatalogContext {
        storage: storage.clone(),
        keys: StorageKeys::default(),
        context_id: ContextId::next(),
        events: events_tx,
    };
    let assets = AssetStore::new(ctx.clone());
    let albums = AlbumStore::new(ctx, assets.clone());
    TestStores {
        storage,
        assets,
        albums,
        events,
    }
}

pub fn drain_events(events: &mut broadcast::Receiver<CatalogEvent>) -> Vec<CatalogEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
