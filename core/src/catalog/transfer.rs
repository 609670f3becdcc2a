use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Album, Asset};

/// File name offered for a full export taken at `at`.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("kavian-assets-{}.json", at.timestamp_millis())
}

/// Full dump of both collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub assets: Vec<Asset>,
    pub albums: Vec<Album>,
    pub export_date: DateTime<Utc>,
}

/// What an import may contain. A missing (or `null`) key leaves that
/// collection alone, a present one replaces it entirely.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub assets: Option<Vec<Asset>>,
    #[serde(default)]
    pub albums: Option<Vec<Album>>,
}
