//! HTTP client for the DashScope generation endpoints.

use tutorlens_core::prompt::{TEXT_REVIEWER_PERSONA, VIDEO_REVIEWER_PERSONA};

use crate::config::InferenceConfig;
use crate::messages::{
    ContentPart, GenerationInput, GenerationParameters, GenerationRequest, GenerationResponse,
    Message, VideoUrl,
};
use crate::InferenceError;

/// Path of the multimodal generation endpoint under the API root.
const MULTIMODAL_PATH: &str = "/services/aigc/multimodal-generation/generation";

/// Path of the text generation endpoint under the API root.
const TEXT_PATH: &str = "/services/aigc/text-generation/generation";

const VIDEO_MAX_LENGTH: u32 = 800;
const VIDEO_TEMPERATURE: f64 = 0.5;
const TEXT_MAX_LENGTH: u32 = 1000;
const TEXT_TEMPERATURE: f64 = 0.7;

/// DashScope client shared by both analysis paths.
#[derive(Clone)]
pub struct DashScopeClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl DashScopeClient {
    /// Build a client whose every request is bounded by `config.timeout`.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InferenceError::Request)?;
        Ok(Self { client, config })
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Ask the multimodal model to review the video at `video_url`.
    ///
    /// `video_url` must be reachable by the provider, so it is normally a
    /// presigned GET URL.
    pub async fn analyze_video(
        &self,
        instruction: &str,
        video_url: &str,
    ) -> Result<String, InferenceError> {
        let api_key = self.api_key()?;
        let request = GenerationRequest {
            model: &self.config.multimodal_model,
            input: GenerationInput {
                messages: vec![
                    Message::system_parts(vec![ContentPart::Text {
                        text: VIDEO_REVIEWER_PERSONA,
                    }]),
                    Message::user_parts(vec![
                        ContentPart::Text { text: instruction },
                        ContentPart::VideoUrl {
                            video_url: VideoUrl { url: video_url },
                        },
                    ]),
                ],
            },
            parameters: GenerationParameters::message(VIDEO_MAX_LENGTH, VIDEO_TEMPERATURE),
        };

        self.generate(api_key, MULTIMODAL_PATH, &request).await
    }

    /// Ask the text model to review from the instruction alone.
    pub async fn analyze_text(&self, instruction: &str) -> Result<String, InferenceError> {
        let api_key = self.api_key()?;
        let request = GenerationRequest {
            model: &self.config.text_model,
            input: GenerationInput {
                messages: vec![
                    Message::system_text(TEXT_REVIEWER_PERSONA),
                    Message::user_text(instruction),
                ],
            },
            parameters: GenerationParameters::message(TEXT_MAX_LENGTH, TEXT_TEMPERATURE),
        };

        self.generate(api_key, TEXT_PATH, &request).await
    }

    // ---- private helpers ----

    fn api_key(&self) -> Result<&str, InferenceError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(InferenceError::MissingApiKey)
    }

    async fn generate(
        &self,
        api_key: &str,
        path: &str,
        request: &GenerationRequest<'_>,
    ) -> Result<String, InferenceError> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(model = request.model, %url, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let response = Self::ensure_success(response).await?;

        let envelope: GenerationResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport(e))?;

        envelope.into_text().ok_or_else(|| {
            InferenceError::MalformedResponse("response carried no message content".into())
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.config.timeout)
        } else if err.is_decode() {
            InferenceError::MalformedResponse(err.to_string())
        } else {
            InferenceError::Request(err)
        }
    }

    /// Return the response unchanged on 2xx, or an [`InferenceError::Api`]
    /// carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, InferenceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
