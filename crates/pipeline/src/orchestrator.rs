//! The analysis state machine.
//!
//! `Start -> RecordFetched -> Analyzed -> Persisted -> Done`, with exits
//! `NotFound`, `Configuration`, `AnalysisUnavailable`, `PersistFailed` and
//! `Store`. Steps within one run are strictly sequential; the pipeline itself
//! holds no mutable state and is shared behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use tutorlens_core::analysis::{AnalysisPath, AnalysisRequest, AnalysisResult};
use tutorlens_core::parser::parse_analysis;
use tutorlens_core::prompt::build_instruction;
use tutorlens_core::video::ACCESS_URL_TTL_SECS;
use tutorlens_db::models::video::Video;
use tutorlens_inference::InferenceError;
use tutorlens_storage::SignRequest;

use crate::error::PipelineError;
use crate::ports::{AccessUrlProvider, TextAnalyzer, VideoAnalyzer, VideoStore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Step a run has reached, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Start,
    RecordFetched,
    Analyzed,
    Persisted,
    Done,
}

impl AnalysisStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::RecordFetched => "record_fetched",
            Self::Analyzed => "analyzed",
            Self::Persisted => "persisted",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the analysis step produced no model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    /// Local misconfiguration. Fallback would fail the same way.
    Configuration(String),
    /// Both inference paths failed.
    Unavailable { multimodal: String, text: String },
}

/// Result of the analysis step, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisAttempt {
    Succeeded { raw: String, path: AnalysisPath },
    Failed(AnalysisFailure),
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The record as returned by the persisting update.
    pub video: Video,
    pub analysis: AnalysisResult,
    pub path: AnalysisPath,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Orchestrates fetch, analysis with fallback, parsing and persistence.
pub struct AnalysisPipeline {
    store: Arc<dyn VideoStore>,
    urls: Arc<dyn AccessUrlProvider>,
    video_analyzer: Arc<dyn VideoAnalyzer>,
    text_analyzer: Arc<dyn TextAnalyzer>,
    access_url_ttl: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<dyn VideoStore>,
        urls: Arc<dyn AccessUrlProvider>,
        video_analyzer: Arc<dyn VideoAnalyzer>,
        text_analyzer: Arc<dyn TextAnalyzer>,
    ) -> Self {
        Self {
            store,
            urls,
            video_analyzer,
            text_analyzer,
            access_url_ttl: Duration::from_secs(ACCESS_URL_TTL_SECS),
        }
    }

    /// Override how long the signed video URL stays valid.
    pub fn with_access_url_ttl(mut self, ttl: Duration) -> Self {
        self.access_url_ttl = ttl;
        self
    }

    /// Run the full pipeline for one request.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, PipelineError> {
        let id = request.video_id;
        tracing::info!(video_id = id, stage = %AnalysisStage::Start, "Analysis started");

        // 1. Fetch the record.
        let video = self
            .store
            .find_video(id)
            .await?
            .ok_or(PipelineError::NotFound { id })?;
        tracing::debug!(video_id = id, stage = %AnalysisStage::RecordFetched, "Video record loaded");

        // 2. Analyze, falling back to text-only at most once.
        let instruction = build_instruction(&request.student_name, &request.issues, &request.date);
        let (raw, path) = match self.attempt(&video, &instruction).await {
            AnalysisAttempt::Succeeded { raw, path } => (raw, path),
            AnalysisAttempt::Failed(AnalysisFailure::Configuration(msg)) => {
                tracing::error!(video_id = id, error = %msg, "Analysis is not configured");
                return Err(PipelineError::Configuration(msg));
            }
            AnalysisAttempt::Failed(AnalysisFailure::Unavailable { multimodal, text }) => {
                tracing::error!(
                    video_id = id,
                    multimodal_error = %multimodal,
                    text_error = %text,
                    "Both analysis paths failed",
                );
                return Err(PipelineError::AnalysisUnavailable(text));
            }
        };

        let parsed = parse_analysis(&raw, request.issues.len());
        tracing::info!(
            video_id = id,
            stage = %AnalysisStage::Analyzed,
            path = %path,
            structured = parsed.is_structured(),
            issues = parsed.result().issues.len(),
            "Analysis produced",
        );
        let analysis = parsed.into_result();

        // 3. Persist. No retry: the computed analysis goes back to the caller.
        let video = match self.store.save_analysis(id, &analysis).await {
            Ok(Some(video)) => video,
            Ok(None) => {
                tracing::error!(video_id = id, "Video vanished before analysis was saved");
                return Err(PipelineError::PersistFailed {
                    analysis: Box::new(analysis),
                    reason: format!("video {id} no longer exists"),
                });
            }
            Err(e) => {
                tracing::error!(video_id = id, error = %e, "Failed to save analysis");
                return Err(PipelineError::PersistFailed {
                    analysis: Box::new(analysis),
                    reason: e.to_string(),
                });
            }
        };
        tracing::debug!(video_id = id, stage = %AnalysisStage::Persisted, "Analysis saved");

        tracing::info!(video_id = id, stage = %AnalysisStage::Done, path = %path, "Analysis complete");
        Ok(AnalysisOutcome {
            video,
            analysis,
            path,
        })
    }

    /// Multimodal first; on any upstream failure exactly one text-only call.
    pub async fn attempt(&self, video: &Video, instruction: &str) -> AnalysisAttempt {
        let multimodal_error = match self.multimodal(video, instruction).await {
            Ok(raw) => {
                return AnalysisAttempt::Succeeded {
                    raw,
                    path: AnalysisPath::Multimodal,
                }
            }
            Err(MultimodalError::Inference(InferenceError::MissingApiKey)) => {
                return AnalysisAttempt::Failed(AnalysisFailure::Configuration(
                    InferenceError::MissingApiKey.to_string(),
                ))
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            video_id = video.id,
            error = %multimodal_error,
            "Multimodal analysis failed, falling back to text-only",
        );

        match self.text_analyzer.analyze_text(instruction).await {
            Ok(raw) => AnalysisAttempt::Succeeded {
                raw,
                path: AnalysisPath::TextOnly,
            },
            Err(e) if !e.is_upstream() => {
                AnalysisAttempt::Failed(AnalysisFailure::Configuration(e.to_string()))
            }
            Err(e) => AnalysisAttempt::Failed(AnalysisFailure::Unavailable {
                multimodal: multimodal_error,
                text: e.to_string(),
            }),
        }
    }

    async fn multimodal(&self, video: &Video, instruction: &str) -> Result<String, MultimodalError> {
        let key = video
            .object_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(MultimodalError::NoObjectKey)?;

        let url = self
            .urls
            .sign(key, &SignRequest::get(self.access_url_ttl))
            .await
            .map_err(|e| MultimodalError::Signing(e.to_string()))?;

        self.video_analyzer
            .analyze_video(instruction, &url)
            .await
            .map_err(MultimodalError::Inference)
    }
}

/// Reasons the multimodal path could not produce output.
#[derive(Debug, thiserror::Error)]
enum MultimodalError {
    #[error("video has no object key")]
    NoObjectKey,
    #[error("failed to sign video URL: {0}")]
    Signing(String),
    #[error(transparent)]
    Inference(InferenceError),
}
