use thiserror::Error;

use crate::core::storage::StorageError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Value stored under a collection key is not a valid collection
    #[error("data stored under key '{key}' is corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize collection for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Import document could not be parsed
    #[error("invalid import document")]
    InvalidDocument(#[source] serde_json::Error),
    #[error("could not read upload '{name}'")]
    Upload {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
