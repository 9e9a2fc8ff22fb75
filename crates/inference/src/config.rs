use std::time::Duration;

/// Default DashScope API root.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";

/// Default vision-language model for the video path.
pub const DEFAULT_MULTIMODAL_MODEL: &str = "qwen-vl-plus";

/// Default language model for the text-only path.
pub const DEFAULT_TEXT_MODEL: &str = "qwen-turbo";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Inference service settings.
#[derive(Clone)]
pub struct InferenceConfig {
    /// `None` means every call fails with `MissingApiKey`.
    pub api_key: Option<String>,
    /// API root without trailing slash.
    pub base_url: String,
    pub multimodal_model: String,
    pub text_model: String,
    /// Ceiling for a single outbound call.
    pub timeout: Duration,
}

impl InferenceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                 |
    /// |--------------------------|-----------------------------------------|
    /// | `DASHSCOPE_API_KEY`      | unset                                   |
    /// | `DASHSCOPE_BASE_URL`     | `https://dashscope.aliyuncs.com/api/v1` |
    /// | `DASHSCOPE_VL_MODEL`     | `qwen-vl-plus`                          |
    /// | `DASHSCOPE_TEXT_MODEL`   | `qwen-turbo`                            |
    /// | `INFERENCE_TIMEOUT_SECS` | `10`                                    |
    pub fn from_env() -> Self {
        let api_key = std::env::var("DASHSCOPE_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let base_url = std::env::var("DASHSCOPE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let multimodal_model = std::env::var("DASHSCOPE_VL_MODEL")
            .unwrap_or_else(|_| DEFAULT_MULTIMODAL_MODEL.into());

        let text_model = std::env::var("DASHSCOPE_TEXT_MODEL")
            .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.into());

        let timeout_secs: u64 = std::env::var("INFERENCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("INFERENCE_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            multimodal_model,
            text_model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration pointing at `base_url` with default models and timeout.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            multimodal_model: DEFAULT_MULTIMODAL_MODEL.into(),
            text_model: DEFAULT_TEXT_MODEL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("multimodal_model", &self.multimodal_model)
            .field("text_model", &self.text_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
