use std::sync::Arc;

use gallery_common::storage::BlobStore;

use crate::config::AppConfig;
use crate::repository::PhotoRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub photos: Arc<dyn PhotoRepository>,
    pub blob_store: Arc<dyn BlobStore>,
}
