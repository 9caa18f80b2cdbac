use chrono::{DateTime, Utc};
use gallery_common::storage::BlobName;

/// Maximum length of a device identifier, in characters.
pub const MAX_DEVICE_ID_LEN: usize = 100;

/// Result of validating a device identifier.
#[derive(Debug, PartialEq, Eq)]
pub enum DeviceIdError {
    /// Identifier is longer than [`MAX_DEVICE_ID_LEN`] characters.
    TooLong,
    /// Identifier contains control characters (CR, LF, NUL, ...).
    ControlCharacter,
}

impl DeviceIdError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooLong => "Device id must be 1-100 characters",
            Self::ControlCharacter => "Device id must not contain control characters",
        }
    }
}

/// Resolve the identifier recorded for an upload.
///
/// A missing or blank value becomes `default`; anything else is trimmed and
/// must be at most 100 characters.
pub fn resolve_device_id(raw: Option<&str>, default: &str) -> Result<String, DeviceIdError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Ok(default.to_string());
    }

    if trimmed.chars().count() > MAX_DEVICE_ID_LEN {
        return Err(DeviceIdError::TooLong);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(DeviceIdError::ControlCharacter);
    }

    Ok(trimmed.to_string())
}

/// Make a device identifier safe to embed in a file name.
///
/// Only `[A-Za-z0-9_-]` survive; every other character becomes `_`.
pub fn filename_component(device_id: &str) -> String {
    device_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Suggested blob name for a photo:
/// `photos/YYYY/MM/DD/{device}_{YYYYMMDD_HHMMSS}.jpg`.
pub fn photo_blob_name(device_id: &str, now: DateTime<Utc>) -> BlobName {
    BlobName::new(
        now.format("photos/%Y/%m/%d").to_string(),
        format!(
            "{}_{}",
            filename_component(device_id),
            now.format("%Y%m%d_%H%M%S")
        ),
        "jpg",
    )
}
