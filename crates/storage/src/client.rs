//! Presigned URL generation for an S3-compatible bucket.

use std::time::Duration;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;

use crate::config::StorageConfig;
use crate::StorageError;

/// HTTP method a presigned URL is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignMethod {
    Get,
    /// Uploads must send exactly this `Content-Type`.
    Put { content_type: String },
}

/// What to sign: method scope and validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    pub expires_in: Duration,
    pub method: SignMethod,
}

impl SignRequest {
    pub fn get(expires_in: Duration) -> Self {
        Self {
            expires_in,
            method: SignMethod::Get,
        }
    }

    pub fn put(expires_in: Duration, content_type: impl Into<String>) -> Self {
        Self {
            expires_in,
            method: SignMethod::Put {
                content_type: content_type.into(),
            },
        }
    }
}

/// Client for one bucket.
pub struct ObjectStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStorage {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.access_key_secret,
            None,
            None,
            "tutorlens-env",
        );

        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .build();

        let scheme = config
            .endpoint
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or("https");

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base_url: format!("{scheme}://{}.{}", config.bucket, config.endpoint_host()),
        }
    }

    /// Produce a time-limited URL for `key` scoped to the requested method.
    ///
    /// Signing is local; no request reaches the storage service.
    pub async fn presign(&self, key: &str, request: &SignRequest) -> Result<String, StorageError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StorageError::InvalidKey("object key is empty".into()));
        }

        let presigning = PresigningConfig::expires_in(request.expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let presigned = match &request.method {
            SignMethod::Get => self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(presigning)
                .await
                .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?,
            SignMethod::Put { content_type } => self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .content_type(content_type)
                .presigned(presigning)
                .await
                .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?,
        };

        tracing::debug!(
            key,
            expires_secs = request.expires_in.as_secs(),
            "Presigned object URL"
        );
        Ok(presigned.uri().to_string())
    }

    /// Permanent (unsigned) URL of an object, as stored in `videos.file_url`.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, encode_key(key))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set, keeping `/`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
