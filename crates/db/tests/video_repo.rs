//! Integration tests for `VideoRepo` against a real database.
//!
//! Requires a Postgres `DATABASE_URL`; run with `cargo test -- --ignored`.

use sqlx::PgPool;
use tutorlens_db::models::video::{CreateVideo, UpdateVideo, VideoListQuery};
use tutorlens_db::repositories::VideoRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_video(student_id: &str, key: &str) -> CreateVideo {
    CreateVideo {
        student_id: student_id.to_string(),
        file_url: format!("https://bucket.example.com/{key}"),
        file_name: Some("clip.mp4".to_string()),
        object_key: Some(key.to_string()),
        file_size: Some(1024),
        duration: Some(42.5),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn create_starts_pending(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("s1", "videos/s1/1_a.mp4"))
        .await
        .unwrap();

    assert_eq!(video.status, "pending");
    assert!(video.ai_analysis.is_none());
    assert_eq!(video.object_key.as_deref(), Some("videos/s1/1_a.mp4"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn find_by_id_missing_returns_none(pool: PgPool) {
    let found = VideoRepo::find_by_id(&pool, 999_999).await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn save_analysis_marks_completed(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("s1", "k")).await.unwrap();
    let analysis = serde_json::json!({
        "summary": "ok",
        "issues": [],
        "feedback": "good",
        "raw": "good",
    });

    let updated = VideoRepo::save_analysis(&pool, video.id, &analysis)
        .await
        .unwrap()
        .expect("row exists");

    assert_eq!(updated.status, "completed");
    assert_eq!(updated.ai_analysis, Some(analysis));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn save_analysis_missing_row_returns_none(pool: PgPool) {
    let result = VideoRepo::save_analysis(&pool, 424_242, &serde_json::json!({}))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_filters_by_student_newest_first(pool: PgPool) {
    let first = VideoRepo::create(&pool, &new_video("a", "k1")).await.unwrap();
    let second = VideoRepo::create(&pool, &new_video("a", "k2")).await.unwrap();
    VideoRepo::create(&pool, &new_video("b", "k3")).await.unwrap();

    let videos = VideoRepo::list(
        &pool,
        &VideoListQuery {
            student_id: Some("a".to_string()),
            limit: None,
        },
    )
    .await
    .unwrap();

    let ids: Vec<i64> = videos.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_respects_limit(pool: PgPool) {
    for i in 0..3 {
        VideoRepo::create(&pool, &new_video("a", &format!("k{i}")))
            .await
            .unwrap();
    }

    let videos = VideoRepo::list(
        &pool,
        &VideoListQuery {
            student_id: None,
            limit: Some(2),
        },
    )
    .await
    .unwrap();

    assert_eq!(videos.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn update_applies_only_present_fields(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("s", "k")).await.unwrap();

    let updated = VideoRepo::update(
        &pool,
        video.id,
        &UpdateVideo {
            feedback: Some("Nice pronunciation".to_string()),
            status: None,
        },
    )
    .await
    .unwrap()
    .expect("row exists");

    assert_eq!(updated.feedback.as_deref(), Some("Nice pronunciation"));
    assert_eq!(updated.status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn invalid_status_violates_check_constraint(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("s", "k")).await.unwrap();

    let result = VideoRepo::update(
        &pool,
        video.id,
        &UpdateVideo {
            feedback: None,
            status: Some("archived".to_string()),
        },
    )
    .await;

    assert!(result.is_err());
}
