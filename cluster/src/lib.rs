//! Deterministic greedy clustering of embedding vectors.
//!
//! Works with any embedding type (face, visual, text, etc.); ids are plain
//! strings supplied by the caller.
//!
//! # Usage
//!
//! ```
//! use faceflow_cluster::{cluster_embeddings, Config};
//!
//! let input = vec![
//!     ("img1".to_string(), vec![1.0, 0.0, 0.0]),
//!     ("img2".to_string(), vec![0.9, 0.1, 0.0]),
//!     ("img3".to_string(), vec![0.0, 0.0, 1.0]),
//! ];
//! let clusters = cluster_embeddings(&input, &Config::default()).unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].id, "cluster-1");
//! assert_eq!(clusters[0].photo_ids, vec!["img1", "img2"]);
//! ```
//!
//! # Design
//!
//! A single pass assigns each vector to the FIRST existing cluster whose
//! centroid meets the threshold, scanning clusters in creation order. This is
//! order-dependent on purpose: the same ordered input always yields the same
//! ids, memberships and centroids. Unlike a nearest-centroid match, ties
//! between clusters are broken by creation order, never by magnitude.

mod error;
mod greedy;
mod math;

pub use error::ClusterError;
pub use greedy::{cluster_embeddings, ClusterResult, Config, DEFAULT_PREFIX, DEFAULT_THRESHOLD};
pub use math::{cosine_sim, l2_normalize};
