use serde::{Deserialize, Serialize};

use crate::model::{Album, AlbumId, AssetId};

/// Persisted form of an [`Album`]. `count` is written for readers that
/// expect it but ignored on read, the album derives it from `image_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntity {
    pub id: AlbumId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_fa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_fa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub image_ids: Vec<AssetId>,
    #[serde(default)]
    pub count: usize,
}

impl From<AlbumEntity> for Album {
    fn from(value: AlbumEntity) -> Self {
        Album {
            id: value.id,
            title: value.title,
            title_fa: value.title_fa,
            description: value.description,
            description_fa: value.description_fa,
            category: value.category,
            location: value.location,
            year: value.year,
            cover: value.cover,
            image_ids: value.image_ids,
        }
    }
}

impl From<Album> for AlbumEntity {
    fn from(value: Album) -> Self {
        let count = value.count();
        AlbumEntity {
            id: value.id,
            title: value.title,
            title_fa: value.title_fa,
            description: value.description,
            description_fa: value.description_fa,
            category: value.category,
            location: value.location,
            year: value.year,
            cover: value.cover,
            image_ids: value.image_ids,
            count,
        }
    }
}
