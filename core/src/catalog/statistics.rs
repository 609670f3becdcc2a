use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::model::{Album, Asset};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_assets: usize,
    pub total_albums: usize,
    /// Megabytes. `NaN` if any asset has a non-numeric size.
    #[serde(serialize_with = "serialize_two_decimals")]
    pub total_size: f64,
    pub by_category: BTreeMap<String, usize>,
    pub by_folder: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn collect(assets: &[Asset], albums: &[Album]) -> Statistics {
        Statistics {
            total_assets: assets.len(),
            total_albums: albums.len(),
            total_size: assets.iter().map(|asset| asset.size).sum(),
            by_category: group_counts(assets.iter().map(|asset| asset.category.as_str())),
            by_folder: group_counts(assets.iter().map(|asset| asset.folder.as_str())),
        }
    }
}

fn group_counts<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    keys.counts()
        .into_iter()
        .map(|(key, count)| (key.to_owned(), count))
        .collect()
}

fn serialize_two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", value))
}
