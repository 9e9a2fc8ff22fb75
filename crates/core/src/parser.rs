//! Tolerant parser for model output.
//!
//! Model text is untrusted: it may be well-formed JSON, JSON wrapped in
//! prose or code fences, or plain prose. [`parse_analysis`] never fails. It
//! produces a [`ParsedAnalysis::Structured`] result when a JSON object can be
//! recovered and a [`ParsedAnalysis::Synthetic`] one otherwise.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::analysis::{AnalysisResult, Issue};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Summary used whenever the model does not provide one.
pub const DEFAULT_SUMMARY: &str = "分析完成";

/// Description of each synthetic issue ("needs supplementation from video content").
pub const PLACEHOLDER_ISSUE: &str = "需要根据视频内容补充";

/// Suggestion attached to each synthetic issue.
pub const PLACEHOLDER_SUGGESTION: &str = "继续努力";

/// Stands in for `feedback` and `raw` when the model returned nothing.
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "模型未返回内容";

/// Greedy first-`{` to last-`}` match across newlines.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which tier of the parser produced the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnalysis {
    /// A JSON object was recovered from the model text.
    Structured(AnalysisResult),
    /// No usable JSON; issues were synthesized from the expected count.
    Synthetic(AnalysisResult),
}

impl ParsedAnalysis {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    pub fn result(&self) -> &AnalysisResult {
        match self {
            Self::Structured(r) | Self::Synthetic(r) => r,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            Self::Structured(r) | Self::Synthetic(r) => r,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Turn raw model text into an analysis result.
///
/// `expected_issue_count` is the number of clips in the request; it sizes the
/// synthetic issue list when no JSON object can be recovered.
pub fn parse_analysis(raw: &str, expected_issue_count: usize) -> ParsedAnalysis {
    if raw.trim().is_empty() {
        return ParsedAnalysis::Synthetic(synthetic_result(
            EMPTY_OUTPUT_PLACEHOLDER,
            expected_issue_count,
        ));
    }

    match extract_json_object(raw) {
        Some(obj) => ParsedAnalysis::Structured(structured_result(&obj, raw)),
        None => ParsedAnalysis::Synthetic(synthetic_result(raw, expected_issue_count)),
    }
}

/// Find the outermost `{...}` span and decode it as a JSON object.
fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let candidate = JSON_OBJECT_RE.find(raw)?.as_str();
    match serde_json::from_str::<Value>(candidate).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn structured_result(obj: &Map<String, Value>, raw: &str) -> AnalysisResult {
    AnalysisResult {
        summary: non_empty_str(obj.get("summary"))
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string(),
        issues: obj
            .get("issues")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(issue_from_value).collect())
            .unwrap_or_default(),
        feedback: non_empty_str(obj.get("feedback")).unwrap_or(raw).to_string(),
        raw: raw.to_string(),
    }
}

fn synthetic_result(text: &str, expected_issue_count: usize) -> AnalysisResult {
    let issues = (1..=expected_issue_count)
        .map(|i| Issue {
            issue: PLACEHOLDER_ISSUE.to_string(),
            video_index: Some(u32::try_from(i).unwrap_or(u32::MAX)),
            suggestion: Some(PLACEHOLDER_SUGGESTION.to_string()),
        })
        .collect();

    AnalysisResult {
        summary: DEFAULT_SUMMARY.to_string(),
        issues,
        feedback: text.to_string(),
        raw: text.to_string(),
    }
}

/// Accept `{"issue": ..}`, `{"description": ..}` or a bare string. Anything
/// else is skipped.
fn issue_from_value(value: &Value) -> Option<Issue> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Issue {
            issue: s.clone(),
            video_index: None,
            suggestion: None,
        }),
        Value::Object(obj) => {
            let issue = non_empty_str(obj.get("issue"))
                .or_else(|| non_empty_str(obj.get("description")))?;
            let video_index = obj
                .get("videoIndex")
                .or_else(|| obj.get("index"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok());
            Some(Issue {
                issue: issue.to_string(),
                video_index,
                suggestion: non_empty_str(obj.get("suggestion")).map(str::to_string),
            })
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
