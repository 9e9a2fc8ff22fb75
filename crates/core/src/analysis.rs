//! Analysis request and result types.
//!
//! [`AnalysisRequest`] is built once per invocation and discarded afterwards.
//! [`AnalysisResult`] is what gets persisted to `videos.ai_analysis` and
//! returned to the caller; its JSON shape is
//! `{summary, issues: [{issue, videoIndex?, suggestion?}], feedback, raw}`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// One practice clip as described by the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoIssueNote {
    /// Human-readable duration label, e.g. `"1:30"`. Numeric durations
    /// (seconds as stored on the video row) are kept as their decimal text.
    #[serde(deserialize_with = "duration_label")]
    pub duration: String,
    /// Free-text issue the student noticed, if any.
    #[serde(default)]
    pub issue: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationLabel {
    Text(String),
    Number(serde_json::Number),
}

fn duration_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match DurationLabel::deserialize(deserializer)? {
        DurationLabel::Text(text) => text,
        DurationLabel::Number(n) => n.to_string(),
    })
}

/// Validated input to one run of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub video_id: DbId,
    pub student_name: String,
    pub issues: Vec<VideoIssueNote>,
    pub date: String,
}

impl AnalysisRequest {
    /// Build a request, rejecting blank student names and dates.
    ///
    /// An empty `issues` list is allowed; the parser then produces no
    /// synthetic issues.
    pub fn new(
        video_id: DbId,
        student_name: impl Into<String>,
        issues: Vec<VideoIssueNote>,
        date: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let student_name = student_name.into();
        let date = date.into();

        if student_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "studentName must not be empty".into(),
            ));
        }
        if date.trim().is_empty() {
            return Err(CoreError::Validation("date must not be empty".into()));
        }

        Ok(Self {
            video_id,
            student_name,
            issues,
            date,
        })
    }
}

/// A single problem reported by the model (or a synthetic placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Description of the problem.
    pub issue: String,
    /// 1-based clip index the issue refers to.
    #[serde(rename = "videoIndex", default, skip_serializing_if = "Option::is_none")]
    pub video_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Structured outcome of one analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub issues: Vec<Issue>,
    /// The model's full narrative answer.
    pub feedback: String,
    /// Unmodified model output, kept for auditing.
    pub raw: String,
}

/// Which inference path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPath {
    Multimodal,
    TextOnly,
}

impl AnalysisPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multimodal => "multimodal",
            Self::TextOnly => "text_only",
        }
    }
}

impl std::fmt::Display for AnalysisPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
