//! Faceflow service layer and HTTP API.
//!
//! [`Service`] coordinates the repository and the clustering engine;
//! [`http::router`] exposes it over JSON/HTTP.

pub mod config;
pub mod error;
pub mod http;
pub mod service;

pub use config::{Config, ConfigError};
pub use error::ServiceError;
pub use http::{router, serve};
pub use service::Service;
