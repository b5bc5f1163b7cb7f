use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Album
// ---------------------------------------------------------------------------

/// A named collection of photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Album {
    /// Creates an album with a fresh id and the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// Upload payload for a photo. The album is taken from the request path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoInput {
    pub filename: String,

    /// Empty means no embedding is available.
    #[serde(default)]
    pub embedding: Vec<f32>,

    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// A stored photo. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub album_id: String,
    pub filename: String,
    #[serde(default)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    pub uploaded_at: DateTime<Utc>,
}

impl Photo {
    /// Creates a photo in `album_id` with a fresh id and the current time.
    pub fn new(album_id: impl Into<String>, input: PhotoInput) -> Self {
        Self {
            id: new_id(),
            album_id: album_id.into(),
            filename: input.filename,
            embedding: input.embedding,
            metadata: input.metadata,
            uploaded_at: Utc::now(),
        }
    }

    pub fn has_embedding(&self) -> bool {
        !self.embedding.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

/// A group of visually similar photos within one album.
///
/// Ids are unique within one clustering run of an album, not globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub album_id: String,
    /// L2-normalized, same dimension as the member embeddings.
    pub centroid: Vec<f32>,
    /// Member photo ids in assignment order.
    pub photo_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Cluster {
    pub fn new(
        album_id: impl Into<String>,
        id: impl Into<String>,
        photo_ids: Vec<String>,
        centroid: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            album_id: album_id.into(),
            centroid,
            photo_ids,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ShareBundle
// ---------------------------------------------------------------------------

/// Request to share clusters of an album with a set of recipients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareBundleInput {
    pub album_id: String,
    pub cluster_ids: Vec<String>,
    pub recipients: Vec<String>,
}

/// A stored share of one or more clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareBundle {
    pub id: String,
    pub album_id: String,
    pub cluster_ids: Vec<String>,
    pub recipients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub download_url: String,
}

impl ShareBundle {
    /// Creates a bundle with a fresh id and the current time.
    pub fn new(input: ShareBundleInput, download_url: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            album_id: input.album_id,
            cluster_ids: input.cluster_ids,
            recipients: input.recipients,
            created_at: Utc::now(),
            download_url: download_url.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AlbumSummary
// ---------------------------------------------------------------------------

/// An album with its photos and current clusters, taken at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub album: Album,
    pub photos: Vec<Photo>,
    pub clusters: Vec<Cluster>,
}
