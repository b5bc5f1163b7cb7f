//! Request-level operations on top of the repository and the clustering
//! engine. The HTTP layer is a thin mapping over [`Service`].

use std::sync::Arc;

use faceflow_cluster::cluster_embeddings;
use faceflow_store::{
    Album, AlbumSummary, Cluster, Photo, PhotoInput, Repository, ShareBundle, ShareBundleInput,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ServiceError;

/// Maximum album name length, in characters.
pub const MAX_ALBUM_NAME: usize = 120;

pub struct Service {
    repo: Arc<dyn Repository>,
    cluster_cfg: faceflow_cluster::Config,
    share_base_url: String,
}

impl Service {
    pub fn new(repo: Arc<dyn Repository>, cfg: &Config) -> Self {
        Self {
            repo,
            cluster_cfg: cfg.cluster_config(),
            share_base_url: cfg.share_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn list_albums(&self) -> Vec<Album> {
        self.repo.list_albums()
    }

    pub fn create_album(&self, name: &str) -> Result<Album, ServiceError> {
        let len = name.chars().count();
        if len == 0 || len > MAX_ALBUM_NAME {
            return Err(ServiceError::InvalidInput(format!(
                "name must be 1 to {MAX_ALBUM_NAME} characters"
            )));
        }
        let album = self.repo.create_album(name);
        info!(album_id = %album.id, "album created");
        Ok(album)
    }

    pub fn album_summary(&self, album_id: &str) -> Result<AlbumSummary, ServiceError> {
        self.repo
            .album_summary(album_id)
            .ok_or(ServiceError::NotFound("Album"))
    }

    pub fn add_photo(&self, album_id: &str, input: PhotoInput) -> Result<Photo, ServiceError> {
        if input.filename.is_empty() {
            return Err(ServiceError::InvalidInput("filename must not be empty".into()));
        }
        if self.repo.get_album(album_id).is_none() {
            return Err(ServiceError::NotFound("Album"));
        }
        let photo = self.repo.add_photo(Photo::new(album_id, input))?;
        debug!(
            album_id,
            photo_id = %photo.id,
            dim = photo.embedding.len(),
            "photo uploaded"
        );
        Ok(photo)
    }

    /// Clusters the album's photos as of now and replaces its cluster set.
    ///
    /// Photos added while the pass runs are not included; they are picked up
    /// by the next run.
    pub fn run_clustering(&self, album_id: &str) -> Result<Vec<Cluster>, ServiceError> {
        if self.repo.get_album(album_id).is_none() {
            return Err(ServiceError::NotFound("Album"));
        }

        let input: Vec<(String, Vec<f32>)> = self
            .repo
            .list_photos(album_id)
            .into_iter()
            .filter(Photo::has_embedding)
            .map(|p| (p.id, p.embedding))
            .collect();
        if input.is_empty() {
            return Err(ServiceError::NoEmbeddings);
        }

        let results = cluster_embeddings(&input, &self.cluster_cfg)?;
        let clusters: Vec<Cluster> = results
            .into_iter()
            .map(|r| Cluster::new(album_id, r.id, r.photo_ids, r.centroid))
            .collect();

        let saved = self.repo.save_clusters(album_id, clusters)?;
        info!(
            album_id,
            photos = input.len(),
            clusters = saved.len(),
            "clustering finished"
        );
        Ok(saved)
    }

    pub fn create_share(&self, input: ShareBundleInput) -> Result<ShareBundle, ServiceError> {
        let download_url = format!("{}/{}/bundle", self.share_base_url, input.album_id);
        let bundle = self.repo.create_bundle(ShareBundle::new(input, download_url))?;
        info!(
            album_id = %bundle.album_id,
            bundle_id = %bundle.id,
            recipients = bundle.recipients.len(),
            "share bundle created"
        );
        Ok(bundle)
    }

    pub fn get_share(&self, bundle_id: &str) -> Result<ShareBundle, ServiceError> {
        self.repo
            .get_bundle(bundle_id)
            .ok_or(ServiceError::NotFound("Share bundle"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use faceflow_cluster::ClusterError;
    use faceflow_store::{MemoryRepository, StoreError};

    use super::*;

    fn service() -> Service {
        Service::new(Arc::new(MemoryRepository::new()), &Config::default())
    }

    fn upload(svc: &Service, album_id: &str, filename: &str, embedding: &[f32]) -> Photo {
        svc.add_photo(
            album_id,
            PhotoInput {
                filename: filename.into(),
                embedding: embedding.to_vec(),
                metadata: Some(HashMap::from([("camera".into(), "phone".into())])),
            },
        )
        .unwrap()
    }

    #[test]
    fn album_name_validation() {
        let svc = service();
        assert!(matches!(svc.create_album(""), Err(ServiceError::InvalidInput(_))));
        let long = "x".repeat(MAX_ALBUM_NAME + 1);
        assert!(matches!(svc.create_album(&long), Err(ServiceError::InvalidInput(_))));
        let ok = "x".repeat(MAX_ALBUM_NAME);
        assert!(svc.create_album(&ok).is_ok());
    }

    #[test]
    fn add_photo_to_unknown_album() {
        let svc = service();
        let err = svc
            .add_photo("missing", PhotoInput { filename: "a.jpg".into(), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Album")));
    }

    #[test]
    fn add_photo_requires_filename() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        let err = svc.add_photo(&album.id, PhotoInput::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn lifecycle() {
        let svc = service();
        let album = svc.create_album("Summer").unwrap();
        upload(&svc, &album.id, "img1.jpg", &[1.0, 0.0, 0.0]);
        upload(&svc, &album.id, "img2.jpg", &[0.9, 0.1, 0.0]);

        let clusters = svc.run_clustering(&album.id).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, "cluster-1");
        assert_eq!(clusters[0].album_id, album.id);
        assert_eq!(clusters[0].photo_ids.len(), 2);

        let bundle = svc
            .create_share(ShareBundleInput {
                album_id: album.id.clone(),
                cluster_ids: vec![clusters[0].id.clone()],
                recipients: vec!["alice@example.com".into()],
            })
            .unwrap();
        assert_eq!(
            bundle.download_url,
            format!("https://share.faceflow.local/{}/bundle", album.id)
        );
        assert_eq!(svc.get_share(&bundle.id).unwrap(), bundle);
    }

    #[test]
    fn clustering_skips_photos_without_embeddings() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        let with = upload(&svc, &album.id, "a.jpg", &[1.0, 0.0]);
        upload(&svc, &album.id, "b.jpg", &[]);

        let clusters = svc.run_clustering(&album.id).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].photo_ids, vec![with.id]);
    }

    #[test]
    fn clustering_without_embeddings() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        assert!(matches!(svc.run_clustering(&album.id), Err(ServiceError::NoEmbeddings)));
        upload(&svc, &album.id, "b.jpg", &[]);
        assert!(matches!(svc.run_clustering(&album.id), Err(ServiceError::NoEmbeddings)));
    }

    #[test]
    fn clustering_unknown_album() {
        let svc = service();
        assert!(matches!(svc.run_clustering("missing"), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn clustering_rejects_mixed_dimensions() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        upload(&svc, &album.id, "a.jpg", &[1.0, 0.0]);
        upload(&svc, &album.id, "b.jpg", &[1.0, 0.0, 0.0]);
        let err = svc.run_clustering(&album.id).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Cluster(ClusterError::DimensionMismatch { .. })
        ));
        assert!(svc.album_summary(&album.id).unwrap().clusters.is_empty());
    }

    #[test]
    fn rerun_replaces_clusters() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        upload(&svc, &album.id, "a.jpg", &[1.0, 0.0]);
        assert_eq!(svc.run_clustering(&album.id).unwrap().len(), 1);

        upload(&svc, &album.id, "b.jpg", &[0.0, 1.0]);
        let second = svc.run_clustering(&album.id).unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(svc.album_summary(&album.id).unwrap().clusters, second);
    }

    #[test]
    fn share_with_unknown_cluster() {
        let svc = service();
        let album = svc.create_album("a").unwrap();
        upload(&svc, &album.id, "a.jpg", &[1.0, 0.0]);
        svc.run_clustering(&album.id).unwrap();

        let err = svc
            .create_share(ShareBundleInput {
                album_id: album.id.clone(),
                cluster_ids: vec!["cluster-1".into(), "cluster-5".into()],
                recipients: vec!["bob@example.com".into()],
            })
            .unwrap_err();
        match err {
            ServiceError::Store(StoreError::UnknownClusters { cluster_ids, .. }) => {
                assert_eq!(cluster_ids, vec!["cluster-5"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_share() {
        let svc = service();
        assert!(matches!(svc.get_share("nope"), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn share_base_url_trailing_slash() {
        let cfg = Config {
            share_base_url: "https://example.com/s/".into(),
            ..Config::default()
        };
        let svc = Service::new(Arc::new(MemoryRepository::new()), &cfg);
        let album = svc.create_album("a").unwrap();
        upload(&svc, &album.id, "a.jpg", &[1.0]);
        let cluster = svc.run_clustering(&album.id).unwrap().remove(0);
        let bundle = svc
            .create_share(ShareBundleInput {
                album_id: album.id.clone(),
                cluster_ids: vec![cluster.id],
                recipients: vec!["a@example.com".into()],
            })
            .unwrap();
        assert_eq!(bundle.download_url, format!("https://example.com/s/{}/bundle", album.id));
    }
}
