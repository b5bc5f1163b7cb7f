use axum::extract::rejection::JsonRejection;
use faceflow_cluster::ClusterError;
use faceflow_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("No embeddings available for clustering")]
    NoEmbeddings,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("clustering: {0}")]
    Cluster(#[from] ClusterError),
}
