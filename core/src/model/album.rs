use serde::{Deserialize, Serialize};

use super::{AlbumId, AssetId};

/// A named grouping of assets. The number of images is derived from
/// `image_ids` and never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "crate::model::repository::entity::AlbumEntity",
    into = "crate::model::repository::entity::AlbumEntity"
)]
pub struct Album {
    pub id: AlbumId,
    pub title: Option<String>,
    pub title_fa: Option<String>,
    pub description: Option<String>,
    pub description_fa: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
    /// URL of the cover image, not an asset reference
    pub cover: Option<String>,
    pub image_ids: Vec<AssetId>,
}

impl Album {
    pub fn count(&self) -> usize {
        self.image_ids.len()
    }

    /// Appends the ids not already in the album, keeping first occurrence order.
    pub(crate) fn merge_image_ids(&mut self, image_ids: &[AssetId]) {
        for id in image_ids {
            if !self.image_ids.contains(id) {
                self.image_ids.push(*id);
            }
        }
    }

    pub(crate) fn apply(&mut self, update: AlbumUpdate) {
        let AlbumUpdate {
            title,
            title_fa,
            description,
            description_fa,
            category,
            location,
            year,
            cover,
            image_ids,
        } = update;
        let fields = [
            (&mut self.title, title),
            (&mut self.title_fa, title_fa),
            (&mut self.description, description),
            (&mut self.description_fa, description_fa),
            (&mut self.category, category),
            (&mut self.location, location),
            (&mut self.year, year),
            (&mut self.cover, cover),
        ];
        for (field, value) in fields {
            if value.is_some() {
                *field = value;
            }
        }
        if let Some(image_ids) = image_ids {
            self.image_ids = image_ids;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    pub title: Option<String>,
    pub title_fa: Option<String>,
    pub description: Option<String>,
    pub description_fa: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
    pub cover: Option<String>,
    #[serde(default)]
    pub image_ids: Vec<AssetId>,
}

/// Shallow merge: every `Some` field overwrites the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdate {
    pub title: Option<String>,
    pub title_fa: Option<String>,
    pub description: Option<String>,
    pub description_fa: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
    pub cover: Option<String>,
    pub image_ids: Option<Vec<AssetId>>,
}
