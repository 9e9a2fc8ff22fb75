//! S3-compatible object storage access.
//!
//! The service never streams video bytes itself. It hands out presigned URLs:
//! PUT URLs for browser uploads and GET URLs for the multimodal inference
//! service. Signing is delegated to the AWS SDK presigner.

pub mod client;
pub mod config;

pub use client::{ObjectStorage, SignMethod, SignRequest};
pub use config::StorageConfig;

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required environment variable is not set.
    #[error("Storage configuration missing: {0}")]
    MissingConfig(&'static str),

    /// The object key is empty or otherwise unusable.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// The presigner rejected the request.
    #[error("Failed to presign URL: {0}")]
    Presign(String),
}
