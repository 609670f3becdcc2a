use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{util::deserialize_lenient_size, AssetId};

pub const DEFAULT_FOLDER: &str = "projects";
pub const DEFAULT_CATEGORY: &str = "general";

/// One catalog entry: an image and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Slash delimited logical path, e.g. `projects/equipment`
    pub folder: String,
    pub category: String,
    /// Remote URL or an embedded `data:` URL
    pub url: String,
    /// Megabytes. `NaN` if the stored value was not numeric.
    #[serde(default, deserialize_with = "deserialize_lenient_size")]
    pub size: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Asset {
    /// `folder` is `"all"`, equal to the asset's folder or one of its ancestors.
    pub fn is_in_folder(&self, folder: &str) -> bool {
        if folder == "all" {
            return true;
        }
        self.folder == folder
            || self
                .folder
                .strip_prefix(folder)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Case insensitive substring match on name, description and tags.
    /// `lower_query` must already be lower case.
    pub fn matches_query(&self, lower_query: &str) -> bool {
        self.name.to_lowercase().contains(lower_query)
            || self.description.to_lowercase().contains(lower_query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(lower_query))
    }

    pub(crate) fn apply(&mut self, update: AssetUpdate) {
        let AssetUpdate {
            name,
            folder,
            category,
            url,
            size,
            date,
            tags,
            description,
        } = update;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(folder) = folder {
            self.folder = folder;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(size) = size {
            self.size = size;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }
}

/// Input for adding an asset. Unset fields get their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    pub url: String,
    pub folder: Option<String>,
    pub category: Option<String>,
    pub size: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

/// Shallow merge: every `Some` field overwrites the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub folder: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub size: Option<f64>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}
