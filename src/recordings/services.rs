use anyhow::Context;
use bytes::Bytes;
use rand::Rng;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    error::AppError,
    recordings::{dto::RecordingSummary, repo_types::Recording},
    state::AppState,
};

/// Media types produced by browser capture that we accept.
pub const ALLOWED_MIME_TYPES: &[&str] = &["video/webm", "video/mp4", "audio/webm", "audio/wav"];

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// Lower-cased media type without parameters: `Video/WebM; codecs=vp8` -> `video/webm`.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn is_allowed_mime(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_essence(content_type).as_str())
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match mime_essence(ct).as_str() {
        "video/webm" | "audio/webm" => Some("webm"),
        "video/mp4" => Some("mp4"),
        "audio/wav" => Some("wav"),
        _ => None,
    }
}

/// `recording-<unix millis>-<random>.<ext>`
pub fn generate_storage_key(content_type: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!(
        "recording-{}-{}.{}",
        millis,
        suffix,
        ext_from_mime(content_type).unwrap_or("bin")
    )
}

#[instrument(skip(st, upload), fields(content_type = %upload.content_type, bytes = upload.body.len()))]
pub async fn create_recording(
    st: &AppState,
    user_id: i64,
    upload: UploadItem,
) -> Result<RecordingSummary, AppError> {
    if !is_allowed_mime(&upload.content_type) {
        warn!("rejected media type");
        return Err(AppError::UnsupportedMediaType);
    }
    let limit = st.config.storage.max_upload_bytes;
    if upload.body.len() as u64 > limit {
        warn!(limit, "upload over size limit");
        return Err(AppError::PayloadTooLarge { limit });
    }

    // Extension follows the media type, never the client file name.
    let key = generate_storage_key(&upload.content_type);
    st.storage
        .put_object(&key, upload.body, &upload.content_type)
        .await
        .with_context(|| format!("store blob {}", key))?;

    let row = match st.recordings.insert(user_id, &key).await {
        Ok(row) => row,
        Err(e) => {
            // Compensate so the failed insert does not leave an orphaned blob.
            if let Err(cleanup) = st.storage.delete_object(&key).await {
                error!(key = %key, error = ?cleanup, "orphaned blob left after failed insert");
            }
            return Err(e.into());
        }
    };

    info!(recording_id = row.id, key = %key, file_name = ?upload.file_name, "recording stored");
    Ok(row.into())
}

#[instrument(skip(st))]
pub async fn list_recordings(
    st: &AppState,
    requesting_user_id: i64,
    target_user_id: i64,
) -> Result<Vec<Recording>, AppError> {
    if requesting_user_id != target_user_id {
        warn!("listing another user's recordings");
        return Err(AppError::Forbidden("Unauthorized to access these recordings"));
    }
    Ok(st.recordings.list_by_user(target_user_id).await?)
}

#[instrument(skip(st))]
pub async fn delete_recording(
    st: &AppState,
    requesting_user_id: i64,
    recording_id: i64,
) -> Result<(), AppError> {
    let recording = st
        .recordings
        .find_by_id(recording_id)
        .await?
        .ok_or(AppError::NotFound("Recording not found"))?;

    if recording.user_id != requesting_user_id {
        warn!(owner = recording.user_id, "delete by non-owner");
        return Err(AppError::Forbidden("Unauthorized to delete this recording"));
    }

    // Blob first: a failure here leaves the row pointing at a live file.
    st.storage
        .delete_object(&recording.filepath)
        .await
        .with_context(|| format!("remove blob {}", recording.filepath))?;

    let deleted = st.recordings.delete(recording_id).await.map_err(|e| {
        error!(key = %recording.filepath, "row delete failed after blob removal");
        e
    })?;
    if !deleted {
        // Another request removed the row between our lookup and delete.
        return Err(AppError::NotFound("Recording not found"));
    }

    info!(key = %recording.filepath, "recording deleted");
    Ok(())
}
