//! Domain entities and the concurrent repository for Faceflow.
//!
//! The [`Repository`] trait owns albums, photos, clusters and share bundles.
//! [`MemoryRepository`] keeps everything in process memory behind a single
//! lock; nothing is persisted.

pub mod error;
pub mod memory;
pub mod repository;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use types::{
    Album, AlbumSummary, Cluster, Photo, PhotoInput, ShareBundle, ShareBundleInput,
};
