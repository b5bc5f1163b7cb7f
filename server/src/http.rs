//! HTTP API.
//!
//! API endpoints:
//! - GET  /albums                    - list albums
//! - POST /albums                    - create album `{name}`
//! - GET  /albums/{album_id}         - album with photos and clusters
//! - POST /albums/{album_id}/photos  - upload photo `{filename, embedding, metadata}`
//! - POST /albums/{album_id}/cluster - re-cluster the album
//! - POST /share                     - create share bundle `{album_id, cluster_ids, recipients}`
//! - GET  /share/{bundle_id}         - fetch share bundle

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use faceflow_cluster::ClusterError;
use faceflow_store::{
    Album, AlbumSummary, Cluster, Photo, PhotoInput, ShareBundle, ShareBundleInput, StoreError,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::error::ServiceError;
use crate::service::Service;

#[derive(Debug, Deserialize)]
struct CreateAlbum {
    name: String,
}

/// Builds the API router.
pub fn router(service: Arc<Service>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/{album_id}", get(get_album_summary))
        .route("/albums/{album_id}/photos", post(add_photo))
        .route("/albums/{album_id}/cluster", post(run_clustering))
        .route("/share", post(create_share))
        .route("/share/{bundle_id}", get(get_share))
        .layer(cors)
        .with_state(service)
}

/// Serves the API on an already-bound listener until the server stops.
pub async fn serve(listener: TcpListener, service: Arc<Service>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "faceflow listening");
    }
    axum::serve(listener, router(service)).await
}

async fn list_albums(State(svc): State<Arc<Service>>) -> Json<Vec<Album>> {
    Json(svc.list_albums())
}

async fn create_album(
    State(svc): State<Arc<Service>>,
    body: Result<Json<CreateAlbum>, JsonRejection>,
) -> Result<(StatusCode, Json<Album>), ServiceError> {
    let Json(req) = body?;
    let album = svc.create_album(&req.name)?;
    Ok((StatusCode::CREATED, Json(album)))
}

async fn get_album_summary(
    State(svc): State<Arc<Service>>,
    Path(album_id): Path<String>,
) -> Result<Json<AlbumSummary>, ServiceError> {
    Ok(Json(svc.album_summary(&album_id)?))
}

async fn add_photo(
    State(svc): State<Arc<Service>>,
    Path(album_id): Path<String>,
    body: Result<Json<PhotoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Photo>), ServiceError> {
    let Json(input) = body?;
    let photo = svc.add_photo(&album_id, input)?;
    Ok((StatusCode::CREATED, Json(photo)))
}

async fn run_clustering(
    State(svc): State<Arc<Service>>,
    Path(album_id): Path<String>,
) -> Result<Json<Vec<Cluster>>, ServiceError> {
    Ok(Json(svc.run_clustering(&album_id)?))
}

async fn create_share(
    State(svc): State<Arc<Service>>,
    body: Result<Json<ShareBundleInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ShareBundle>), ServiceError> {
    let Json(input) = body?;
    let bundle = svc.create_share(input)?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

async fn get_share(
    State(svc): State<Arc<Service>>,
    Path(bundle_id): Path<String>,
) -> Result<Json<ShareBundle>, ServiceError> {
    Ok(Json(svc.get_share(&bundle_id)?))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, json!(self.to_string())),
            ServiceError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            ServiceError::Body(rejection) => (rejection.status(), json!(rejection.body_text())),
            ServiceError::NoEmbeddings => (StatusCode::BAD_REQUEST, json!(self.to_string())),
            ServiceError::Store(err) => match err {
                StoreError::AlbumNotFound(_) => {
                    (StatusCode::NOT_FOUND, json!("Album not found"))
                }
                StoreError::UnknownClusters { cluster_ids, .. } => (
                    StatusCode::BAD_REQUEST,
                    json!({"message": "Unknown clusters", "cluster_ids": cluster_ids}),
                ),
                StoreError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
                StoreError::AlreadyExists(_) => (StatusCode::CONFLICT, json!(err.to_string())),
                StoreError::UnknownPhoto { .. } => {
                    error!(error = %err, "cluster set rejected");
                    (StatusCode::INTERNAL_SERVER_ERROR, json!(err.to_string()))
                }
            },
            ServiceError::Cluster(err) => match err {
                ClusterError::InvalidThreshold(_) => {
                    error!(error = %err, "clustering misconfigured");
                    (StatusCode::INTERNAL_SERVER_ERROR, json!(err.to_string()))
                }
                _ => (StatusCode::BAD_REQUEST, json!(err.to_string())),
            },
        };
        if status.is_client_error() {
            warn!(%status, error = %self, "request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
