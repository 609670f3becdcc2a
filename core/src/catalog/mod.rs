//! A catalog context: asset and album stores attached to one storage area,
//! plus change notifications, cross-context sync, statistics, upload and
//! export/import.
//!
//! Several catalogs can share one [`Storage`]. Each gets its own
//! [`ContextId`] and its own notification channel, like browser tabs sharing
//! a profile's local storage. Catalogs with different namespaces don't see
//! each other's collections at all.

use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::{
    core::storage::{Storage, StorageArea},
    model::{
        repository::{
            album::AlbumStore, asset::AssetStore, CatalogContext, CatalogError, CatalogResult,
        },
        CatalogEvent, ContextId,
    },
};

pub mod statistics;
pub mod storage_key;
pub mod sync;
pub mod transfer;
pub mod upload;

use statistics::Statistics;
use storage_key::{StorageKeys, LAST_UPDATE};
use sync::SyncHandle;
use transfer::{ExportDocument, ImportDocument};
use upload::UploadFile;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct Catalog {
    ctx: CatalogContext,
    assets: AssetStore,
    albums: AlbumStore,
    sync: Option<SyncHandle>,
}

impl Catalog {
    /// Attaches a new context to `storage`. Nothing is written until
    /// [`Catalog::init`] or a mutation.
    pub fn new(storage: Storage, namespace: &str) -> Catalog {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let ctx = CatalogContext {
            storage,
            keys: StorageKeys::for_namespace(namespace),
            context_id: ContextId::next(),
            events,
        };
        let assets = AssetStore::new(ctx.clone());
        let albums = AlbumStore::new(ctx.clone(), assets.clone());
        Catalog {
            ctx,
            assets,
            albums,
            sync: None,
        }
    }

    /// Seeds sample assets if the storage area has no asset collection yet.
    pub fn init(&self) -> CatalogResult<()> {
        if self.assets.init()? {
            info!(key = %self.ctx.keys.assets, "seeded sample assets");
        }
        Ok(())
    }

    /// Starts forwarding collection writes made by other contexts to this
    /// catalog's listeners. Needs a tokio runtime. Calling it again restarts
    /// the listener.
    pub fn start_sync(&mut self) {
        self.sync = Some(SyncHandle::start(
            &self.ctx.storage,
            self.ctx.keys.clone(),
            self.ctx.context_id,
            self.ctx.events.clone(),
        ));
    }

    /// Stops the sync listener. Stores stay usable.
    pub fn close(&mut self) {
        if let Some(sync) = self.sync.take() {
            sync.stop();
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.ctx.context_id
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.ctx.keys
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn albums(&self) -> &AlbumStore {
        &self.albums
    }

    /// Notifications for mutations made through this catalog and, while sync
    /// is running, for collection writes made by other contexts.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.ctx.events.subscribe()
    }

    /// Writes the current time under `lastUpdate` so other contexts get a
    /// storage event.
    pub fn broadcast_update(&self) -> CatalogResult<()> {
        let now = chrono::Utc::now().timestamp_millis().to_string();
        self.ctx
            .storage
            .set_item(LAST_UPDATE, &now, self.ctx.context_id)?;
        Ok(())
    }

    /// Removes this catalog's collections from the storage area and returns
    /// the removed keys. Other namespaces and `lastUpdate` are kept. The next
    /// [`Catalog::init`] seeds the sample assets again.
    #[instrument(skip(self))]
    pub fn reset(&self) -> CatalogResult<Vec<String>> {
        let removed = self
            .ctx
            .storage
            .keys()
            .into_iter()
            .filter(|key| self.ctx.keys.is_collection_key(key))
            .collect::<Vec<_>>();
        for key in &removed {
            self.ctx.storage.remove_item(key, self.ctx.context_id)?;
        }
        if !removed.is_empty() {
            self.ctx.notify(CatalogEvent::AssetsUpdated(None));
        }
        info!(?removed, "reset catalog");
        Ok(removed)
    }

    pub fn get_statistics(&self) -> CatalogResult<Statistics> {
        let assets = self.assets.get_all_assets()?;
        let albums = self.albums.get_all_albums()?;
        Ok(Statistics::collect(&assets, &albums))
    }

    pub fn upload_files(
        &self,
        files: impl IntoIterator<Item = UploadFile>,
        folder: &str,
        category: &str,
    ) -> CatalogResult<Vec<crate::model::Asset>> {
        upload::upload_files(&self.assets, files, folder, category)
    }

    pub fn export(&self) -> CatalogResult<ExportDocument> {
        Ok(ExportDocument {
            assets: self.assets.get_all_assets()?,
            albums: self.albums.get_all_albums()?,
            export_date: chrono::Utc::now(),
        })
    }

    pub fn export_json(&self) -> CatalogResult<String> {
        let document = self.export()?;
        serde_json::to_string_pretty(&document).map_err(|source| CatalogError::Serialize {
            key: "export".to_owned(),
            source,
        })
    }

    /// Writes a full export into `dir` and returns the path of the new file.
    #[instrument(skip(self))]
    pub fn export_to_dir(&self, dir: &Path) -> CatalogResult<PathBuf> {
        let document = self.export()?;
        let path = dir.join(transfer::export_file_name(document.export_date));
        let contents =
            serde_json::to_string_pretty(&document).map_err(|source| CatalogError::Serialize {
                key: "export".to_owned(),
                source,
            })?;
        std::fs::write(&path, contents)?;
        info!(%path, assets = document.assets.len(), albums = document.albums.len(), "exported catalog");
        Ok(path)
    }

    /// Replaces each collection present in `json`. Nothing is written if the
    /// document does not parse.
    #[instrument(skip(self, json))]
    pub fn import_json(&self, json: &str) -> CatalogResult<ImportDocument> {
        let document: ImportDocument =
            serde_json::from_str(json).map_err(CatalogError::InvalidDocument)?;
        if let Some(assets) = &document.assets {
            self.assets.replace_all(assets)?;
        }
        if let Some(albums) = &document.albums {
            self.albums.replace_all(albums)?;
        }
        self.ctx.notify(CatalogEvent::AssetsUpdated(None));
        info!(
            assets = ?document.assets.as_ref().map(Vec::len),
            albums = ?document.albums.as_ref().map(Vec::len),
            "imported catalog"
        );
        Ok(document)
    }

    pub fn import_file(&self, path: &Path) -> CatalogResult<ImportDocument> {
        let json = std::fs::read_to_string(path)?;
        self.import_json(&json)
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        self.close();
    }
}
