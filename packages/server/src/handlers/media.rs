use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use gallery_common::storage::BlobKey;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Download a stored image",
    description = "Streams the blob behind a photo `url`.",
    params(("key" = String, Path, description = "Blob key, e.g. photos/2024/05/01/cam7_20240501_101500.jpg")),
    responses(
        (status = 200, description = "Image content"),
        (status = 400, description = "Malformed key", body = String),
        (status = 404, description = "No such blob", body = String),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let key = BlobKey::parse(&key)?;

    let size = state.blob_store.size(&key).await?;
    let reader = state.blob_store.get_stream(&key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(key.file_name()).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        // Blobs are never rewritten under the same key.
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
