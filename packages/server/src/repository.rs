use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::photo;

/// Filter and window for [`PhotoRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoQuery {
    pub offset: u64,
    /// `None` returns every row from `offset` on.
    pub limit: Option<u64>,
    pub device_id: Option<String>,
}

impl PhotoQuery {
    /// The newest `n` photos.
    pub fn latest(n: u64) -> Self {
        Self {
            limit: Some(n),
            ..Default::default()
        }
    }

    pub fn page(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
            device_id: None,
        }
    }
}

/// Durable photo metadata.
///
/// `list` orders by `created_at` descending with ties broken by `id`
/// descending, so the newest upload always comes first.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Record a stored blob. `id` and `created_at` are assigned here.
    async fn insert(&self, device_id: &str, image: &str) -> Result<photo::Model, DbErr>;

    async fn list(&self, query: &PhotoQuery) -> Result<Vec<photo::Model>, DbErr>;
}

/// [`PhotoRepository`] backed by a sea-orm connection pool.
#[derive(Clone)]
pub struct SeaOrmPhotoRepository {
    db: DatabaseConnection,
}

impl SeaOrmPhotoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotoRepository for SeaOrmPhotoRepository {
    async fn insert(&self, device_id: &str, image: &str) -> Result<photo::Model, DbErr> {
        let model = photo::ActiveModel {
            device_id: Set(device_id.to_string()),
            image: Set(image.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model.insert(&self.db).await
    }

    async fn list(&self, query: &PhotoQuery) -> Result<Vec<photo::Model>, DbErr> {
        let mut select = photo::Entity::find();

        if let Some(ref device_id) = query.device_id {
            select = select.filter(photo::Column::DeviceId.eq(device_id.as_str()));
        }

        select
            .order_by_desc(photo::Column::CreatedAt)
            .order_by_desc(photo::Column::Id)
            .offset((query.offset > 0).then_some(query.offset))
            .limit(query.limit)
            .all(&self.db)
            .await
    }
}
