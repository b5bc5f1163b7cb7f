//! In-memory repository. Data is lost on restart.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::repository::Repository;
use crate::types::{Album, AlbumSummary, Cluster, Photo, ShareBundle};

/// In-memory [`Repository`] implementation.
///
/// All state sits behind one mutex and every operation takes it exactly
/// once, so each operation is linearizable and multi-collection reads
/// (such as [`Repository::album_summary`]) see a single instant.
pub struct MemoryRepository {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    albums: HashMap<String, AlbumEntry>,
    /// Album ids in creation order.
    order: Vec<String>,
    /// Ids of every stored photo, across all albums.
    photo_ids: HashSet<String>,
    bundles: HashMap<String, ShareBundle>,
}

struct AlbumEntry {
    album: Album,
    photos: Vec<Photo>,
    clusters: Vec<Cluster>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(State::default()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryRepository {
    fn create_album(&self, name: &str) -> Album {
        let album = Album::new(name);
        let mut state = self.inner.lock();
        state.order.push(album.id.clone());
        state.albums.insert(
            album.id.clone(),
            AlbumEntry {
                album: album.clone(),
                photos: Vec::new(),
                clusters: Vec::new(),
            },
        );
        debug!(album_id = %album.id, "album created");
        album
    }

    fn get_album(&self, album_id: &str) -> Option<Album> {
        let state = self.inner.lock();
        state.albums.get(album_id).map(|e| e.album.clone())
    }

    fn list_albums(&self) -> Vec<Album> {
        let state = self.inner.lock();
        state
            .order
            .iter()
            .filter_map(|id| state.albums.get(id))
            .map(|e| e.album.clone())
            .collect()
    }

    fn add_photo(&self, photo: Photo) -> Result<Photo, StoreError> {
        let mut state = self.inner.lock();
        if !state.albums.contains_key(&photo.album_id) {
            return Err(StoreError::AlbumNotFound(photo.album_id));
        }
        if !state.photo_ids.insert(photo.id.clone()) {
            return Err(StoreError::AlreadyExists(photo.id));
        }
        if let Some(entry) = state.albums.get_mut(&photo.album_id) {
            entry.photos.push(photo.clone());
        }
        debug!(album_id = %photo.album_id, photo_id = %photo.id, "photo added");
        Ok(photo)
    }

    fn list_photos(&self, album_id: &str) -> Vec<Photo> {
        let state = self.inner.lock();
        state
            .albums
            .get(album_id)
            .map(|e| e.photos.clone())
            .unwrap_or_default()
    }

    fn save_clusters(
        &self,
        album_id: &str,
        clusters: Vec<Cluster>,
    ) -> Result<Vec<Cluster>, StoreError> {
        let mut state = self.inner.lock();
        let entry = state
            .albums
            .get_mut(album_id)
            .ok_or_else(|| StoreError::AlbumNotFound(album_id.to_string()))?;

        validate_clusters(album_id, &entry.photos, &clusters)?;

        entry.clusters = clusters.clone();
        debug!(album_id, clusters = clusters.len(), "clusters replaced");
        Ok(clusters)
    }

    fn list_clusters(&self, album_id: &str) -> Vec<Cluster> {
        let state = self.inner.lock();
        state
            .albums
            .get(album_id)
            .map(|e| e.clusters.clone())
            .unwrap_or_default()
    }

    fn create_bundle(&self, bundle: ShareBundle) -> Result<ShareBundle, StoreError> {
        if bundle.cluster_ids.is_empty() {
            return Err(StoreError::InvalidInput("cluster_ids must not be empty".into()));
        }
        if bundle.recipients.is_empty() {
            return Err(StoreError::InvalidInput("recipients must not be empty".into()));
        }

        let mut state = self.inner.lock();
        let entry = state
            .albums
            .get(&bundle.album_id)
            .ok_or_else(|| StoreError::AlbumNotFound(bundle.album_id.clone()))?;

        let current: HashSet<&str> = entry.clusters.iter().map(|c| c.id.as_str()).collect();
        let missing: Vec<String> = bundle
            .cluster_ids
            .iter()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::UnknownClusters {
                album_id: bundle.album_id,
                cluster_ids: missing,
            });
        }

        if state.bundles.contains_key(&bundle.id) {
            return Err(StoreError::AlreadyExists(bundle.id));
        }
        state.bundles.insert(bundle.id.clone(), bundle.clone());
        debug!(album_id = %bundle.album_id, bundle_id = %bundle.id, "bundle created");
        Ok(bundle)
    }

    fn get_bundle(&self, bundle_id: &str) -> Option<ShareBundle> {
        let state = self.inner.lock();
        state.bundles.get(bundle_id).cloned()
    }

    fn album_summary(&self, album_id: &str) -> Option<AlbumSummary> {
        let state = self.inner.lock();
        state.albums.get(album_id).map(|e| AlbumSummary {
            album: e.album.clone(),
            photos: e.photos.clone(),
            clusters: e.clusters.clone(),
        })
    }
}

/// Checks that a cluster set belongs to `album_id`, has unique ids, and
/// only references photos of that album, each at most once.
fn validate_clusters(
    album_id: &str,
    photos: &[Photo],
    clusters: &[Cluster],
) -> Result<(), StoreError> {
    let album_photos: HashSet<&str> = photos.iter().map(|p| p.id.as_str()).collect();
    let mut cluster_ids: HashSet<&str> = HashSet::with_capacity(clusters.len());
    let mut assigned: HashSet<&str> = HashSet::new();

    for cluster in clusters {
        if cluster.album_id != album_id {
            return Err(StoreError::InvalidInput(format!(
                "cluster {} belongs to album {}",
                cluster.id, cluster.album_id
            )));
        }
        if !cluster_ids.insert(cluster.id.as_str()) {
            return Err(StoreError::InvalidInput(format!(
                "duplicate cluster id {}",
                cluster.id
            )));
        }
        for photo_id in &cluster.photo_ids {
            if !album_photos.contains(photo_id.as_str()) {
                return Err(StoreError::UnknownPhoto {
                    album_id: album_id.to_string(),
                    photo_id: photo_id.clone(),
                });
            }
            if !assigned.insert(photo_id.as_str()) {
                return Err(StoreError::InvalidInput(format!(
                    "photo {photo_id} is in more than one cluster"
                )));
            }
        }
    }
    Ok(())
}
