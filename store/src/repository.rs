use std::fmt;

use crate::error::StoreError;
use crate::types::{Album, AlbumSummary, Cluster, Photo, ShareBundle};

/// Owns albums, photos, clusters and share bundles.
///
/// Implementations must be safe for concurrent use, and every method must be
/// atomic with respect to every other: no caller may observe a partial
/// effect. All accessors return owned copies.
///
/// Use [`crate::MemoryRepository`] for process-lifetime storage.
pub trait Repository: Send + Sync {
    /// Creates and stores a new album. Never fails.
    fn create_album(&self, name: &str) -> Album;

    /// Returns the album, or `None` if it does not exist.
    fn get_album(&self, album_id: &str) -> Option<Album>;

    /// Returns all albums in creation order.
    fn list_albums(&self) -> Vec<Album>;

    /// Appends a photo to its album.
    /// Returns [`StoreError::AlbumNotFound`] if `photo.album_id` is unknown.
    fn add_photo(&self, photo: Photo) -> Result<Photo, StoreError>;

    /// Returns the album's photos in upload order.
    /// An unknown album yields an empty list, same as an empty album.
    fn list_photos(&self, album_id: &str) -> Vec<Photo>;

    /// Replaces the album's entire cluster set.
    /// Returns [`StoreError::AlbumNotFound`] if the album is unknown.
    fn save_clusters(
        &self,
        album_id: &str,
        clusters: Vec<Cluster>,
    ) -> Result<Vec<Cluster>, StoreError>;

    /// Returns the album's current cluster set.
    /// An unknown album yields an empty list, same as an unclustered album.
    fn list_clusters(&self, album_id: &str) -> Vec<Cluster>;

    /// Stores a share bundle after checking that its album exists and that
    /// every referenced cluster is in the album's current cluster set.
    fn create_bundle(&self, bundle: ShareBundle) -> Result<ShareBundle, StoreError>;

    /// Returns the bundle, or `None` if it does not exist.
    fn get_bundle(&self, bundle_id: &str) -> Option<ShareBundle>;

    /// Returns the album together with its photos and clusters as of a
    /// single instant, or `None` if the album does not exist.
    fn album_summary(&self, album_id: &str) -> Option<AlbumSummary>;
}

impl fmt::Debug for dyn Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Repository {{ ... }}")
    }
}
