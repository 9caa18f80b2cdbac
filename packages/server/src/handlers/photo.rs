use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method};
use chrono::Utc;
use futures::TryStreamExt;
use gallery_common::storage::BoxReader;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;
use tracing::{Span, info, instrument, warn};

use crate::error::AppError;
use crate::models::photo::{PhotoListQuery, PhotoResponse, UploadResponse};
use crate::state::AppState;
use crate::utils::filename::{photo_blob_name, resolve_device_id};

/// Header carrying the uploading camera's identifier.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

#[utoipa::path(
    post,
    path = "/upload/",
    tag = "Photos",
    operation_id = "uploadPhoto",
    summary = "Upload a photo",
    description = "Stores the raw request body as a JPEG and records it. Also served at \
        `/api/upload/`. Any method other than POST is rejected with 400.",
    params(
        ("X-Device-Id" = Option<String>, Header, description = "Camera identifier (1-100 characters). Defaults to `esp32cam`."),
    ),
    request_body(content = Vec<u8>, content_type = "image/jpeg", description = "Raw JPEG bytes"),
    responses(
        (status = 200, description = "Photo stored", body = UploadResponse),
        (status = 400, description = "Wrong method, empty body or invalid device id", body = String),
        (status = 413, description = "Body exceeds the configured size limit", body = String),
    ),
)]
#[instrument(skip(state, headers, body), fields(device_id))]
pub async fn upload_photo(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>, AppError> {
    if method != Method::POST {
        return Err(AppError::Validation("method not allowed".into()));
    }

    let mut reader = BufReader::new(body_reader(body));
    if reader
        .fill_buf()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        .is_empty()
    {
        return Err(AppError::Validation("empty body".into()));
    }

    let raw_device_id = headers
        .get(DEVICE_ID_HEADER)
        .map(|value| std::str::from_utf8(value.as_bytes()))
        .transpose()
        .map_err(|_| AppError::Validation("Device id must be valid UTF-8".into()))?;
    let device_id = resolve_device_id(raw_device_id, &state.config.gallery.default_device_id)
        .map_err(|e| AppError::Validation(e.message().into()))?;
    Span::current().record("device_id", device_id.as_str());

    let name = photo_blob_name(&device_id, Utc::now());
    let key = state.blob_store.put_stream(&name, Box::new(reader)).await?;

    let photo = match state.photos.insert(&device_id, key.as_str()).await {
        Ok(photo) => photo,
        Err(err) => {
            // No record points at the blob; remove it before failing.
            match state.blob_store.delete(&key).await {
                Ok(_) => warn!(key = %key, "Removed blob after metadata insert failed"),
                Err(cleanup_err) => {
                    warn!(key = %key, error = %cleanup_err, "Failed to remove orphaned blob")
                }
            }
            return Err(err.into());
        }
    };

    info!(photo_id = photo.id, key = %key, "Stored photo");

    Ok(Json(UploadResponse {
        status: "ok",
        url: state.config.storage.url_for(&photo.image),
        id: photo.id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/photos/",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List photos, newest first",
    description = "Without `offset`/`limit` returns the most recent photos (configured cap). \
        With either parameter returns that window. Unparsable values fall back to \
        `offset=0&limit=20` instead of failing. A repeated parameter keeps its last value.",
    params(PhotoListQuery),
    responses(
        (status = 200, description = "Photos ordered by creation time, newest first", body = [PhotoResponse]),
    ),
)]
#[instrument(skip(state, pairs))]
pub async fn list_photos(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    let photo_query = PhotoListQuery::from_pairs(pairs).resolve(&state.config.gallery);
    let photos = state.photos.list(&photo_query).await?;

    let storage = &state.config.storage;
    Ok(Json(
        photos
            .into_iter()
            .map(|model| PhotoResponse::from_model(model, storage))
            .collect(),
    ))
}

/// Adapt a request body into an async reader for the blob store.
fn body_reader(body: Body) -> BoxReader {
    let stream = body.into_data_stream().map_err(std::io::Error::other);
    Box::new(StreamReader::new(stream))
}
