//! Pipeline scenarios driven by in-memory collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Utc;
use tutorlens_core::analysis::{
    AnalysisPath, AnalysisRequest, AnalysisResult, VideoIssueNote,
};
use tutorlens_core::parser::{DEFAULT_SUMMARY, PLACEHOLDER_ISSUE};
use tutorlens_core::types::DbId;
use tutorlens_db::models::video::Video;
use tutorlens_inference::InferenceError;
use tutorlens_pipeline::{
    AccessUrlProvider, AnalysisPipeline, PipelineError, TextAnalyzer, VideoAnalyzer, VideoStore,
};
use tutorlens_storage::{SignMethod, SignRequest, StorageError};

const STRUCTURED: &str =
    r#"{"summary":"ok","issues":[{"issue":"发音不准","videoIndex":1}],"feedback":"整体不错"}"#;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

fn video(id: DbId, object_key: Option<&str>) -> Video {
    let now = Utc::now();
    Video {
        id,
        student_id: "s1".into(),
        file_name: Some("a.mp4".into()),
        file_url: "https://bucket/videos/s1/a.mp4".into(),
        object_key: object_key.map(String::from),
        file_size: Some(1024),
        duration: Some(90.0),
        status: "pending".into(),
        ai_analysis: None,
        feedback: None,
        upload_time: now,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct FakeStore {
    video: Option<Video>,
    fail_save: bool,
    vanish_on_save: bool,
    saves: Mutex<Vec<AnalysisResult>>,
}

#[async_trait]
impl VideoStore for FakeStore {
    async fn find_video(&self, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        Ok(self.video.clone().filter(|v| v.id == id))
    }

    async fn save_analysis(
        &self,
        _id: DbId,
        analysis: &AnalysisResult,
    ) -> Result<Option<Video>, sqlx::Error> {
        self.saves.lock().unwrap().push(analysis.clone());
        if self.fail_save {
            return Err(sqlx::Error::PoolTimedOut);
        }
        if self.vanish_on_save {
            return Ok(None);
        }
        Ok(self.video.clone().map(|mut v| {
            v.status = "completed".into();
            v.ai_analysis = Some(serde_json::to_value(analysis).unwrap());
            v
        }))
    }
}

#[derive(Default)]
struct FakeSigner {
    fail: bool,
    requests: Mutex<Vec<(String, SignRequest)>>,
}

#[async_trait]
impl AccessUrlProvider for FakeSigner {
    async fn sign(&self, object_key: &str, request: &SignRequest) -> Result<String, StorageError> {
        self.requests
            .lock()
            .unwrap()
            .push((object_key.to_string(), request.clone()));
        if self.fail {
            return Err(StorageError::Presign("clock skew".into()));
        }
        Ok(format!("https://signed/{object_key}"))
    }
}

enum Reply {
    Text(&'static str),
    Upstream,
    MissingKey,
}

impl Reply {
    fn to_result(&self) -> Result<String, InferenceError> {
        match self {
            Self::Text(t) => Ok(t.to_string()),
            Self::Upstream => Err(InferenceError::Api {
                status: 503,
                body: "overloaded".into(),
            }),
            Self::MissingKey => Err(InferenceError::MissingApiKey),
        }
    }
}

struct FakeModel {
    reply: Reply,
    calls: AtomicUsize,
    instructions: Mutex<Vec<String>>,
    urls: Mutex<Vec<String>>,
}

impl FakeModel {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoAnalyzer for FakeModel {
    async fn analyze_video(
        &self,
        instruction: &str,
        video_url: &str,
    ) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions.lock().unwrap().push(instruction.to_string());
        self.urls.lock().unwrap().push(video_url.to_string());
        self.reply.to_result()
    }
}

#[async_trait]
impl TextAnalyzer for FakeModel {
    async fn analyze_text(&self, instruction: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions.lock().unwrap().push(instruction.to_string());
        self.reply.to_result()
    }
}

struct Harness {
    store: Arc<FakeStore>,
    signer: Arc<FakeSigner>,
    vl: Arc<FakeModel>,
    text: Arc<FakeModel>,
    pipeline: AnalysisPipeline,
}

fn harness(store: FakeStore, signer: FakeSigner, vl: Reply, text: Reply) -> Harness {
    let store = Arc::new(store);
    let signer = Arc::new(signer);
    let vl = FakeModel::new(vl);
    let text = FakeModel::new(text);
    let pipeline = AnalysisPipeline::new(
        store.clone(),
        signer.clone(),
        vl.clone(),
        text.clone(),
    );
    Harness {
        store,
        signer,
        vl,
        text,
        pipeline,
    }
}

fn store_with(video: Video) -> FakeStore {
    FakeStore {
        video: Some(video),
        ..Default::default()
    }
}

fn request(id: DbId, clips: usize) -> AnalysisRequest {
    let issues = (0..clips)
        .map(|i| VideoIssueNote {
            duration: format!("0:{:02}", 30 + i),
            issue: None,
        })
        .collect();
    AnalysisRequest::new(id, "小明", issues, "2026-01-05").unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn happy_path_completes_with_multimodal_analysis() {
    let h = harness(
        store_with(video(1, Some("videos/s1/a.mp4"))),
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text("unused"),
    );

    let outcome = h.pipeline.run(&request(1, 1)).await.unwrap();

    assert_eq!(outcome.path, AnalysisPath::Multimodal);
    assert_eq!(outcome.video.status, "completed");
    assert_eq!(outcome.analysis.summary, "ok");
    assert_eq!(outcome.analysis.issues.len(), 1);
    assert_eq!(outcome.analysis.feedback, "整体不错");
    assert_eq!(outcome.analysis.raw, STRUCTURED);

    let saves = h.store.saves.lock().unwrap();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0], outcome.analysis);
    assert_eq!(h.vl.calls(), 1);
    assert_eq!(h.text.calls(), 0);
}

#[tokio::test]
async fn video_is_signed_for_get_with_two_hour_ttl() {
    let h = harness(
        store_with(video(1, Some("videos/s1/a.mp4"))),
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text("unused"),
    );

    h.pipeline.run(&request(1, 1)).await.unwrap();

    let signed = h.signer.requests.lock().unwrap();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].0, "videos/s1/a.mp4");
    assert_eq!(signed[0].1.method, SignMethod::Get);
    assert_eq!(signed[0].1.expires_in.as_secs(), 7200);
    assert_eq!(
        h.vl.urls.lock().unwrap().as_slice(),
        ["https://signed/videos/s1/a.mp4"]
    );
}

#[tokio::test]
async fn custom_access_url_ttl_reaches_signer() {
    let h = harness(
        store_with(video(1, Some("videos/s1/a.mp4"))),
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text("unused"),
    );
    let pipeline = h.pipeline.with_access_url_ttl(Duration::from_secs(600));

    pipeline.run(&request(1, 1)).await.unwrap();

    let signed = h.signer.requests.lock().unwrap();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].1.method, SignMethod::Get);
    assert_eq!(signed[0].1.expires_in, Duration::from_secs(600));
}

#[tokio::test]
async fn multimodal_failure_falls_back_once_with_same_instruction() {
    let h = harness(
        store_with(video(2, Some("videos/s1/b.mp4"))),
        FakeSigner::default(),
        Reply::Upstream,
        Reply::Text("老师的文字反馈"),
    );

    let outcome = h.pipeline.run(&request(2, 2)).await.unwrap();

    assert_eq!(outcome.path, AnalysisPath::TextOnly);
    assert_eq!(h.vl.calls(), 1);
    assert_eq!(h.text.calls(), 1);
    assert_eq!(
        h.vl.instructions.lock().unwrap()[0],
        h.text.instructions.lock().unwrap()[0]
    );

    // Prose output falls to the synthetic tier.
    assert_eq!(outcome.analysis.summary, DEFAULT_SUMMARY);
    assert_eq!(outcome.analysis.issues.len(), 2);
    assert_eq!(outcome.analysis.issues[0].issue, PLACEHOLDER_ISSUE);
    assert_eq!(outcome.analysis.issues[1].video_index, Some(2));
    assert_eq!(outcome.analysis.feedback, "老师的文字反馈");
}

#[tokio::test]
async fn both_paths_failing_is_unavailable_without_update() {
    let h = harness(
        store_with(video(3, Some("videos/s1/c.mp4"))),
        FakeSigner::default(),
        Reply::Upstream,
        Reply::Upstream,
    );

    let err = h.pipeline.run(&request(3, 1)).await.unwrap_err();

    assert_matches!(err, PipelineError::AnalysisUnavailable(_));
    assert!(h.store.saves.lock().unwrap().is_empty());
    assert_eq!(h.vl.calls(), 1);
    assert_eq!(h.text.calls(), 1);
}

#[tokio::test]
async fn unknown_video_is_not_found_without_inference() {
    let h = harness(
        FakeStore::default(),
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text(STRUCTURED),
    );

    let err = h.pipeline.run(&request(99, 1)).await.unwrap_err();

    assert_matches!(err, PipelineError::NotFound { id: 99 });
    assert_eq!(h.vl.calls(), 0);
    assert_eq!(h.text.calls(), 0);
    assert!(h.signer.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn save_failure_returns_analysis_to_caller() {
    let store = FakeStore {
        fail_save: true,
        ..store_with(video(4, Some("videos/s1/d.mp4")))
    };
    let h = harness(
        store,
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text("unused"),
    );

    let err = h.pipeline.run(&request(4, 1)).await.unwrap_err();

    assert_matches!(err, PipelineError::PersistFailed { analysis, reason } => {
        assert_eq!(analysis.summary, "ok");
        assert_eq!(analysis.feedback, "整体不错");
        assert!(!reason.is_empty());
    });
    assert_eq!(h.store.saves.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn vanished_row_on_save_is_persist_failure() {
    let store = FakeStore {
        vanish_on_save: true,
        ..store_with(video(5, Some("videos/s1/e.mp4")))
    };
    let h = harness(
        store,
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text("unused"),
    );

    let err = h.pipeline.run(&request(5, 1)).await.unwrap_err();
    assert_matches!(err, PipelineError::PersistFailed { .. });
}

#[tokio::test]
async fn missing_api_key_is_configuration_error_without_fallback() {
    let h = harness(
        store_with(video(6, Some("videos/s1/f.mp4"))),
        FakeSigner::default(),
        Reply::MissingKey,
        Reply::Text(STRUCTURED),
    );

    let err = h.pipeline.run(&request(6, 1)).await.unwrap_err();

    assert_matches!(err, PipelineError::Configuration(_));
    assert_eq!(h.text.calls(), 0);
    assert!(h.store.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signing_failure_falls_back_to_text_only() {
    let signer = FakeSigner {
        fail: true,
        ..Default::default()
    };
    let h = harness(
        store_with(video(7, Some("videos/s1/g.mp4"))),
        signer,
        Reply::Text(STRUCTURED),
        Reply::Text(STRUCTURED),
    );

    let outcome = h.pipeline.run(&request(7, 1)).await.unwrap();

    assert_eq!(outcome.path, AnalysisPath::TextOnly);
    assert_eq!(h.vl.calls(), 0);
    assert_eq!(h.text.calls(), 1);
}

#[tokio::test]
async fn missing_object_key_falls_back_to_text_only() {
    let h = harness(
        store_with(video(8, None)),
        FakeSigner::default(),
        Reply::Text(STRUCTURED),
        Reply::Text(STRUCTURED),
    );

    let outcome = h.pipeline.run(&request(8, 1)).await.unwrap();

    assert_eq!(outcome.path, AnalysisPath::TextOnly);
    assert!(h.signer.requests.lock().unwrap().is_empty());
    assert_eq!(h.vl.calls(), 0);
}

#[tokio::test]
async fn empty_model_output_still_persists_non_empty_feedback() {
    let h = harness(
        store_with(video(9, Some("videos/s1/h.mp4"))),
        FakeSigner::default(),
        Reply::Text("   "),
        Reply::Text("unused"),
    );

    let outcome = h.pipeline.run(&request(9, 0)).await.unwrap();

    assert!(!outcome.analysis.feedback.is_empty());
    assert!(!outcome.analysis.raw.is_empty());
    assert!(outcome.analysis.issues.is_empty());
}
