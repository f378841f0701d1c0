use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::media::UploadedFile;
use crate::middleware::{multipart::UPLOAD_FAILED, ApiMultipart};
use crate::state::AppState;

/// Multipart field that carries the image
pub const UPLOAD_FIELD: &str = "imageUrl";

/// POST /api/v1/projects/upload - Forward one image to the media host.
/// Responds with `{ "fileUrl": ... }`, outside the data envelope.
pub async fn post(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(broken_body)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(broken_body)?;

        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let file = upload.ok_or_else(|| ApiError::internal_server_error(UPLOAD_FAILED))?;
    if file.bytes.is_empty() {
        return Err(ApiError::internal_server_error(UPLOAD_FAILED));
    }

    let file_url = state.media.upload(file).await?;
    Ok(Json(json!({ "fileUrl": file_url })))
}

fn broken_body(err: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::debug!("Unreadable multipart body: {}", err);
    ApiError::internal_server_error(UPLOAD_FAILED)
}
