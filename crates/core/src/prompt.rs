//! Instruction text sent to both inference services.
//!
//! The rubric and personas are fixed: changing the pedagogy means changing
//! these constants, not the pipeline.

use crate::analysis::VideoIssueNote;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Four evaluation criteria every answer is graded against.
pub const RUBRIC: &str = "分析：1.流程正确吗 2.发音准吗 3.词义对吗 4.是否两英一中纠正";

/// Output format the model is asked to follow.
pub const RESPONSE_FORMAT: &str =
    r#"返回JSON：{"issues":[{"issue":"问题"}],"feedback":"完整反馈"}"#;

/// Rendered in place of an empty issue note.
pub const NO_ISSUE_LABEL: &str = "无";

/// System persona for the multimodal (video) reviewer.
pub const VIDEO_REVIEWER_PERSONA: &str = concat!(
    "你是一位英语老师。分析学生视频：1.是否点击核对 2.发音准确吗 3.词义对吗 ",
    "4.错误后是否两英一中纠正。",
    r#"用JSON返回：{"issues":[{"issue":"问题描述"}],"feedback":"完整反馈"}"#,
);

/// System persona for the text-only fallback reviewer.
pub const TEXT_REVIEWER_PERSONA: &str =
    "你是一位专业的英语老师，根据学生视频的问题描述生成反馈。";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Render one clip line: `视频<n>（<duration>）：<issue or 无>`.
///
/// `index` is 0-based; the rendered number is 1-based.
pub fn render_issue_line(index: usize, note: &VideoIssueNote) -> String {
    let issue = note
        .issue
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_ISSUE_LABEL);
    format!("视频{}（{}）：{}", index + 1, note.duration, issue)
}

/// Assemble the full instruction for one student and session date.
pub fn build_instruction(student_name: &str, issues: &[VideoIssueNote], date: &str) -> String {
    let video_list = issues
        .iter()
        .enumerate()
        .map(|(i, note)| render_issue_line(i, note))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "学生：{student_name}\n日期：{date}\n视频：\n{video_list}\n\n{RUBRIC}\n\n{RESPONSE_FORMAT}"
    )
}
