//! Video lifecycle status, upload constants and object-key naming.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Validity of the read URL handed to the multimodal service (two hours).
pub const ACCESS_URL_TTL_SECS: u64 = 7200;

/// Validity of the presigned upload URL handed to the browser (one hour).
pub const UPLOAD_URL_TTL_SECS: u64 = 3600;

/// Content type the presigned upload URL is scoped to.
pub const UPLOAD_CONTENT_TYPE: &str = "video/mp4";

/// Maximum number of videos returned by an unfiltered listing.
pub const UNFILTERED_LIST_LIMIT: i64 = 100;

/// Prefix under which all uploaded objects live.
pub const OBJECT_KEY_PREFIX: &str = "videos";

/// Length of the random component in generated object keys.
const OBJECT_KEY_SUFFIX_LEN: usize = 6;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status stored in `videos.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Record created, upload not yet confirmed.
    Pending,
    /// Object confirmed in storage.
    Uploaded,
    /// An analysis has been attached.
    Completed,
}

impl VideoStatus {
    /// The database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
            Self::Completed => "completed",
        }
    }

    /// Parse from the database representation.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "pending" => Ok(Self::Pending),
            "uploaded" => Ok(Self::Uploaded),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown video status '{other}'. Must be one of: pending, uploaded, completed"
            ))),
        }
    }
}

impl std::fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Object keys
// ---------------------------------------------------------------------------

/// Build the storage key for a new upload:
/// `videos/<student_id>/<unix_millis>_<suffix>.<ext>`.
///
/// The extension is whatever follows the last `.` in `file_name` (the whole
/// name when there is no dot).
pub fn build_object_key(
    student_id: &str,
    file_name: &str,
    unix_millis: i64,
    suffix: &str,
) -> Result<String, CoreError> {
    let student_id = student_id.trim();
    let file_name = file_name.trim();

    if student_id.is_empty() {
        return Err(CoreError::Validation("student_id must not be empty".into()));
    }
    if student_id.contains('/') {
        return Err(CoreError::Validation(
            "student_id must not contain '/'".into(),
        ));
    }
    if file_name.is_empty() {
        return Err(CoreError::Validation("file_name must not be empty".into()));
    }

    let ext = file_name.rsplit('.').next().unwrap_or(file_name);
    Ok(format!(
        "{OBJECT_KEY_PREFIX}/{student_id}/{unix_millis}_{suffix}.{ext}"
    ))
}

/// Random lowercase base-36 suffix used to keep same-millisecond uploads apart.
pub fn random_key_suffix() -> String {
    let mut rng = rand::rng();
    (0..OBJECT_KEY_SUFFIX_LEN)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
