use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GalleryConfig, StorageConfig};
use crate::entity::photo;
use crate::repository::PhotoQuery;

/// Response DTO for a successful upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Always `"ok"`.
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Public URL of the stored image.
    #[schema(example = "/media/photos/2024/05/01/cam7_20240501_101500.jpg")]
    pub url: String,
    /// Assigned photo ID.
    #[schema(example = 42)]
    pub id: i32,
}

/// Response DTO for a single photo in a listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "esp32cam")]
    pub device_id: String,
    #[schema(example = "/media/photos/2024/05/01/cam7_20240501_101500.jpg")]
    pub url: String,
    /// Upload time, ISO-8601 in UTC.
    pub created_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn from_model(model: photo::Model, storage: &StorageConfig) -> Self {
        Self {
            url: storage.url_for(&model.image),
            id: model.id,
            device_id: model.device_id,
            created_at: model.created_at,
        }
    }
}

/// Raw query parameters for the photo listing.
///
/// Kept as strings so malformed numbers can fall back to the default page
/// instead of rejecting the request.
#[derive(Debug, Default, PartialEq, Eq, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoListQuery {
    /// Number of photos to skip. Non-integer input resets paging to the first page.
    pub offset: Option<String>,
    /// Page size. Non-integer input resets paging to the first page.
    pub limit: Option<String>,
    /// Only list photos from this device.
    pub device_id: Option<String>,
}

impl PhotoListQuery {
    /// Collect the listing parameters from decoded query pairs.
    ///
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "offset" => query.offset = Some(value),
                "limit" => query.limit = Some(value),
                "device_id" => query.device_id = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Resolve the raw parameters into a repository query.
    ///
    /// Without `offset` and `limit` the newest `recent_limit` photos are
    /// returned. If either value fails to parse as a non-negative integer
    /// that fits the database's signed 64-bit range, both fall back to
    /// `offset=0, limit=default_page_limit`.
    pub fn resolve(&self, gallery: &GalleryConfig) -> PhotoQuery {
        let device_id = self
            .device_id
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        if self.offset.is_none() && self.limit.is_none() {
            return PhotoQuery {
                device_id,
                ..PhotoQuery::latest(gallery.recent_limit)
            };
        }

        let offset = parse_param(self.offset.as_deref());
        let limit = parse_param(self.limit.as_deref());

        let (offset, limit) = match (offset, limit) {
            (Some(offset), Some(limit)) => {
                let limit = limit.unwrap_or(gallery.default_page_limit);
                (
                    offset.unwrap_or(0),
                    gallery.max_page_limit.map_or(limit, |cap| limit.min(cap)),
                )
            }
            _ => {
                debug!(
                    offset = ?self.offset,
                    limit = ?self.limit,
                    "Unparsable paging parameters, using first page"
                );
                (0, gallery.default_page_limit)
            }
        };

        PhotoQuery {
            device_id,
            ..PhotoQuery::page(offset, limit)
        }
    }
}

/// `None` on a malformed value; `Some(None)` when the parameter is absent.
fn parse_param(raw: Option<&str>) -> Option<Option<u64>> {
    match raw {
        None => Some(None),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|&n| i64::try_from(n).is_ok())
            .map(Some),
    }
}
