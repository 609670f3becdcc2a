use tracing::{debug, instrument};

use crate::model::{Album, AlbumId, AlbumUpdate, Asset, AssetId, CatalogEvent, NewAlbum};

use super::{asset::AssetStore, seed, CatalogContext, CatalogResult};

/// Album collection stored as one JSON array, with the same whole collection
/// read/rewrite discipline as [`AssetStore`].
#[derive(Debug, Clone)]
pub struct AlbumStore {
    ctx: CatalogContext,
    assets: AssetStore,
}

impl AlbumStore {
    pub fn new(ctx: CatalogContext, assets: AssetStore) -> AlbumStore {
        AlbumStore { ctx, assets }
    }

    fn key(&self) -> &str {
        &self.ctx.keys.albums
    }

    /// Falls back to the default albums while no album collection exists.
    pub fn get_all_albums(&self) -> CatalogResult<Vec<Album>> {
        Ok(self
            .ctx
            .read_collection(self.key())?
            .unwrap_or_else(seed::default_albums))
    }

    pub fn get_album_by_id(&self, id: AlbumId) -> CatalogResult<Option<Album>> {
        Ok(self
            .get_all_albums()?
            .into_iter()
            .find(|album| album.id == id))
    }

    #[instrument(skip(self, new_album))]
    pub fn create_album(&self, new_album: NewAlbum) -> CatalogResult<Album> {
        let mut albums = self.get_all_albums()?;
        let mut id = AlbumId::generate();
        while albums.iter().any(|album| album.id == id) {
            id = AlbumId(id.0 + 1);
        }
        let album = Album {
            id,
            title: new_album.title,
            title_fa: new_album.title_fa,
            description: new_album.description,
            description_fa: new_album.description_fa,
            category: new_album.category,
            location: new_album.location,
            year: new_album.year,
            cover: new_album.cover,
            image_ids: new_album.image_ids,
        };
        albums.push(album.clone());
        self.ctx.write_collection(self.key(), &albums)?;
        self.ctx.notify(CatalogEvent::AlbumsUpdated);
        Ok(album)
    }

    /// Returns false without writing anything if there is no album with `id`.
    #[instrument(skip(self, update))]
    pub fn update_album(&self, id: AlbumId, update: AlbumUpdate) -> CatalogResult<bool> {
        let mut albums = self.get_all_albums()?;
        let Some(album) = albums.iter_mut().find(|album| album.id == id) else {
            debug!("no album to update");
            return Ok(false);
        };
        album.apply(update);
        self.ctx.write_collection(self.key(), &albums)?;
        self.ctx.notify(CatalogEvent::AlbumsUpdated);
        Ok(true)
    }

    /// Adds the ids not already in the album, in order. Applying the same
    /// ids again changes nothing.
    #[instrument(skip(self, image_ids), fields(num_ids = image_ids.len()))]
    pub fn add_images_to_album(
        &self,
        album_id: AlbumId,
        image_ids: &[AssetId],
    ) -> CatalogResult<bool> {
        let Some(mut album) = self.get_album_by_id(album_id)? else {
            debug!("no album to add images to");
            return Ok(false);
        };
        album.merge_image_ids(image_ids);
        self.update_album(
            album_id,
            AlbumUpdate {
                image_ids: Some(album.image_ids),
                ..Default::default()
            },
        )
    }

    /// Assets in album order. Ids that no longer resolve to an asset are skipped.
    pub fn get_album_images(&self, album_id: AlbumId) -> CatalogResult<Vec<Asset>> {
        let Some(album) = self.get_album_by_id(album_id)? else {
            return Ok(Vec::new());
        };
        let assets = self.assets.get_all_assets()?;
        Ok(album
            .image_ids
            .iter()
            .filter_map(|id| assets.iter().find(|asset| asset.id == *id).cloned())
            .collect())
    }

    pub(crate) fn replace_all(&self, albums: &[Album]) -> CatalogResult<()> {
        self.ctx.write_collection(self.key(), albums)
    }
}
