use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::{ImageBlob, StorageError};
use tokio_util::io::ReaderStream;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::models::item::GetImageRequest;
use crate::models::shared::Validate;
use crate::state::AppState;

/// `GET /images/{filename}`
///
/// A well-formed name that is not on disk is a soft miss: the configured
/// default image is served instead with `200`.
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let request = GetImageRequest { filename };
    request.validate()?;

    let blob = match state.images.open(&request.filename).await {
        Ok(blob) => blob,
        Err(StorageError::NotFound(_)) => {
            warn!("image not found, serving default");
            state
                .images
                .open(&state.config.storage.default_image)
                .await?
        }
        Err(e) => {
            warn!(error = %e, "rejected image request");
            return Err(e.into());
        }
    };

    info!(path = %blob.name, "returned image");
    image_response(blob)
}

fn image_response(blob: ImageBlob) -> Result<Response, AppError> {
    let content_type = mime_guess::from_path(&blob.name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, blob.size.to_string())
        .body(Body::from_stream(ReaderStream::new(blob.reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
