use serde::Serialize;

use crate::recordings::repo_types::Recording;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordingSummary {
    pub id: i64,
    pub user_id: i64,
    pub filepath: String,
}

impl From<Recording> for RecordingSummary {
    fn from(r: Recording) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            filepath: r.filepath,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRecordingResponse {
    pub message: &'static str,
    pub recording: RecordingSummary,
}

#[derive(Debug, Serialize)]
pub struct RecordingsResponse {
    pub recordings: Vec<Recording>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
