use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// An I/O error occurred (full disk, permission denied, ...).
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The provided blob key is not a safe relative path.
    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    /// The blob exceeds the configured size limit.
    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// Every candidate name derived from the suggested name was taken.
    #[error("no free blob name for {0} after {1} attempts")]
    NameExhausted(String, usize),
}
