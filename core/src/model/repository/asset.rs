use tracing::{debug, instrument};

use crate::model::{
    Asset, AssetId, AssetUpdate, CatalogEvent, NewAsset, DEFAULT_CATEGORY, DEFAULT_FOLDER,
};

use super::{seed, CatalogContext, CatalogResult};

/// Asset collection stored as one JSON array. Every call reads the whole
/// collection and every mutation rewrites it.
#[derive(Debug, Clone)]
pub struct AssetStore {
    ctx: CatalogContext,
}

impl AssetStore {
    pub fn new(ctx: CatalogContext) -> AssetStore {
        AssetStore { ctx }
    }

    fn key(&self) -> &str {
        &self.ctx.keys.assets
    }

    /// Seeds the sample assets if no asset collection exists yet.
    /// Returns true if it did.
    #[instrument(skip(self))]
    pub fn init(&self) -> CatalogResult<bool> {
        if self.ctx.storage_has(self.key())? {
            return Ok(false);
        }
        debug!("no asset collection found, writing sample data");
        self.ctx.write_collection(self.key(), &seed::sample_assets())?;
        Ok(true)
    }

    pub fn get_all_assets(&self) -> CatalogResult<Vec<Asset>> {
        Ok(self
            .ctx
            .read_collection(self.key())?
            .unwrap_or_default())
    }

    /// `"all"` returns every asset, anything else matches the folder itself
    /// and everything below it.
    pub fn get_assets_by_folder(&self, folder: &str) -> CatalogResult<Vec<Asset>> {
        Ok(self
            .get_all_assets()?
            .into_iter()
            .filter(|asset| asset.is_in_folder(folder))
            .collect())
    }

    pub fn get_assets_by_category(&self, category: &str) -> CatalogResult<Vec<Asset>> {
        Ok(self
            .get_all_assets()?
            .into_iter()
            .filter(|asset| asset.category == category)
            .collect())
    }

    pub fn search_assets(&self, query: &str) -> CatalogResult<Vec<Asset>> {
        let lower_query = query.to_lowercase();
        Ok(self
            .get_all_assets()?
            .into_iter()
            .filter(|asset| asset.matches_query(&lower_query))
            .collect())
    }

    pub fn get_asset_by_id(&self, id: AssetId) -> CatalogResult<Option<Asset>> {
        Ok(self
            .get_all_assets()?
            .into_iter()
            .find(|asset| asset.id == id))
    }

    #[instrument(skip(self, new_asset), fields(name = %new_asset.name))]
    pub fn add_asset(&self, new_asset: NewAsset) -> CatalogResult<Asset> {
        let mut assets = self.get_all_assets()?;
        let id = unused_id(&assets);
        let asset = Asset {
            id,
            name: new_asset.name,
            folder: new_asset
                .folder
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_FOLDER.to_owned()),
            category: new_asset
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            url: new_asset.url,
            size: new_asset.size.unwrap_or(0.0),
            date: chrono::Local::now().date_naive(),
            tags: new_asset.tags.unwrap_or_default(),
            description: new_asset.description.unwrap_or_default(),
        };
        assets.push(asset.clone());
        self.ctx.write_collection(self.key(), &assets)?;
        self.ctx
            .notify(CatalogEvent::AssetsUpdated(Some(asset.clone())));
        Ok(asset)
    }

    /// Returns false without writing anything if there is no asset with `id`.
    #[instrument(skip(self, update))]
    pub fn update_asset(&self, id: AssetId, update: AssetUpdate) -> CatalogResult<bool> {
        let mut assets = self.get_all_assets()?;
        let Some(asset) = assets.iter_mut().find(|asset| asset.id == id) else {
            debug!("no asset to update");
            return Ok(false);
        };
        asset.apply(update);
        self.ctx.write_collection(self.key(), &assets)?;
        self.ctx.notify(CatalogEvent::AssetsUpdated(None));
        Ok(true)
    }

    /// Albums referencing the asset keep the id, it is dropped when their
    /// images are resolved. Returns false if there was no asset with `id`.
    #[instrument(skip(self))]
    pub fn delete_asset(&self, id: AssetId) -> CatalogResult<bool> {
        let mut assets = self.get_all_assets()?;
        let len_before = assets.len();
        assets.retain(|asset| asset.id != id);
        if assets.len() == len_before {
            debug!("no asset to delete");
            return Ok(false);
        }
        self.ctx.write_collection(self.key(), &assets)?;
        self.ctx.notify(CatalogEvent::AssetsUpdated(None));
        Ok(true)
    }

    /// Replaces the whole collection without notifying anyone.
    pub(crate) fn replace_all(&self, assets: &[Asset]) -> CatalogResult<()> {
        self.ctx.write_collection(self.key(), assets)
    }
}

fn unused_id(assets: &[Asset]) -> AssetId {
    loop {
        let id = AssetId::generate();
        if assets.iter().all(|asset| asset.id != id) {
            return id;
        }
    }
}
