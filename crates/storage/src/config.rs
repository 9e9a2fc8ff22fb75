use crate::StorageError;

/// Object storage settings loaded from the environment.
///
/// | Env Var                 | Default                        |
/// |-------------------------|--------------------------------|
/// | `OSS_REGION`            | required                       |
/// | `OSS_BUCKET`            | required                       |
/// | `OSS_ACCESS_KEY_ID`     | required                       |
/// | `OSS_ACCESS_KEY_SECRET` | required                       |
/// | `OSS_ENDPOINT`          | `https://<region>.aliyuncs.com` |
#[derive(Clone)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    /// Base endpoint including scheme, e.g. `https://oss-cn-hangzhou.aliyuncs.com`.
    pub endpoint: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, StorageError> {
        let region = require("OSS_REGION")?;
        let bucket = require("OSS_BUCKET")?;
        let access_key_id = require("OSS_ACCESS_KEY_ID")?;
        let access_key_secret = require("OSS_ACCESS_KEY_SECRET")?;
        let endpoint = std::env::var("OSS_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_endpoint(&region));

        Ok(Self {
            region,
            bucket,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_key_id,
            access_key_secret,
        })
    }

    /// Host part of the endpoint, without scheme.
    pub fn endpoint_host(&self) -> &str {
        self.endpoint
            .split_once("://")
            .map(|(_, host)| host)
            .unwrap_or(&self.endpoint)
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &"<redacted>")
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

fn require(var: &'static str) -> Result<String, StorageError> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .ok_or(StorageError::MissingConfig(var))
}

fn default_endpoint(region: &str) -> String {
    format!("https://{region}.aliyuncs.com")
}
