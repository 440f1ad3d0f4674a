use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, DefaultBodyLimit, Multipart,
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use bytes::BytesMut;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    state::AppState,
};

use super::dto::{CreatedRecordingResponse, MessageResponse, RecordingsResponse};
use super::services::{self, is_allowed_mime, UploadItem};

/// Multipart field carrying the media file.
pub const UPLOAD_FIELD: &str = "recording";

/// Headroom for multipart framing on top of the file size limit.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recordings/user/:user_id", get(list_recordings))
        .route("/recordings/:recording_id", delete(delete_recording))
}

pub fn write_routes(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route("/recordings", post(create_recording))
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
}

/// POST /recordings (multipart, file in the `recording` field)
#[instrument(skip(state, multipart))]
pub async fn create_recording(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatedRecordingResponse>), AppError> {
    let mut mp = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let limit = state.config.storage.max_upload_bytes;

    let mut upload = None;
    while let Some(mut field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::from_multipart(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        // Refuse before buffering anything.
        if !is_allowed_mime(&content_type) {
            return Err(AppError::UnsupportedMediaType);
        }
        let file_name = field.file_name().map(str::to_owned);

        let mut buf = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::from_multipart(e, limit))?
        {
            if (buf.len() + chunk.len()) as u64 > limit {
                return Err(AppError::PayloadTooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        upload = Some(UploadItem {
            body: buf.freeze(),
            content_type,
            file_name,
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    let recording = services::create_recording(&state, user_id, upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedRecordingResponse {
            message: "Recording saved successfully",
            recording,
        }),
    ))
}

#[instrument(skip(state, path))]
pub async fn list_recordings(
    State(state): State<AppState>,
    AuthUser(requesting_user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<RecordingsResponse>, AppError> {
    let Path(target_user_id) = path?;
    let recordings = services::list_recordings(&state, requesting_user_id, target_user_id).await?;
    Ok(Json(RecordingsResponse { recordings }))
}

#[instrument(skip(state, path))]
pub async fn delete_recording(
    State(state): State<AppState>,
    AuthUser(requesting_user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(recording_id) = path?;
    services::delete_recording(&state, requesting_user_id, recording_id).await?;
    Ok(Json(MessageResponse {
        message: "Recording deleted successfully",
    }))
}
