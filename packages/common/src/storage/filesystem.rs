use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use super::error::StorageError;
use super::key::{BlobKey, BlobName};
use super::traits::{BlobStore, BoxReader};

/// Upper bound on name candidates tried before giving up.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem-backed blob store.
///
/// Blobs live at `{root}/{key}`. Writes are spooled to `{root}/.tmp` and then
/// published with a hard link, which fails atomically if the target name is
/// already taken. Readers therefore never observe a partially written blob,
/// and concurrent writers with the same suggested name end up with distinct
/// keys.
pub struct FilesystemBlobStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &BlobKey) -> PathBuf {
        key.to_path(&self.root)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Copy the reader into `temp_path`, enforcing the size limit.
    async fn spool(&self, mut reader: BoxReader, temp_path: &Path) -> Result<u64, StorageError> {
        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
        let mut temp_file = fs::File::create(temp_path).await?;
        let mut total_bytes: u64 = 0;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        temp_file.sync_all().await?;
        Ok(total_bytes)
    }

    /// Link the spooled file under the first free candidate of `name`.
    async fn publish(&self, name: &BlobName, temp_path: &Path) -> Result<BlobKey, StorageError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let key = name.candidate(attempt)?;
            let blob_path = self.blob_path(&key);

            if let Some(parent) = blob_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            match fs::hard_link(temp_path, &blob_path).await {
                Ok(()) => return Ok(key),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(key = %key, attempt, "Blob name taken, trying next candidate");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::NameExhausted(
            name.to_string(),
            MAX_NAME_ATTEMPTS,
        ))
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(
        &self,
        name: &BlobName,
        reader: BoxReader,
    ) -> Result<BlobKey, StorageError> {
        let temp_path = self.temp_path();

        let result = async {
            let size = self.spool(reader, &temp_path).await?;
            let key = self.publish(name, &temp_path).await?;
            debug!(key = %key, size, "Stored blob");
            Ok(key)
        }
        .await;

        // Best effort; on success the blob survives through its hard link.
        let _ = fs::remove_file(&temp_path).await;

        result
    }

    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.blob_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.blob_path(key)).await?)
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, key: &BlobKey) -> Result<u64, StorageError> {
        match fs::metadata(self.blob_path(key)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
