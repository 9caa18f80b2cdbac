use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded image. Rows are written once and never updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Identifier sent by the uploading camera (`X-Device-Id`).
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub device_id: String,

    /// Blob store key of the image.
    pub image: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
