use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store: album not found: {0}")]
    AlbumNotFound(String),

    #[error("store: already exists: {0}")]
    AlreadyExists(String),

    #[error("store: photo {photo_id} not in album {album_id}")]
    UnknownPhoto { album_id: String, photo_id: String },

    #[error("store: unknown clusters in album {album_id}: {cluster_ids:?}")]
    UnknownClusters {
        album_id: String,
        cluster_ids: Vec<String>,
    },

    #[error("store: invalid input: {0}")]
    InvalidInput(String),
}

