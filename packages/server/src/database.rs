use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::photo;

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;

    Ok(db)
}

/// Create the `photo` table and its listing indexes if they are missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let mut table = Schema::new(backend).create_table_from_entity(photo::Entity);
    table.if_not_exists();
    db.execute_raw(backend.build(&table)).await?;

    // Listing order: ORDER BY created_at DESC, id DESC
    let by_created = Index::create()
        .if_not_exists()
        .name("idx_photo_created_at_id")
        .table(photo::Entity)
        .col(photo::Column::CreatedAt)
        .col(photo::Column::Id)
        .to_owned();
    db.execute_raw(backend.build(&by_created)).await?;

    let by_device = Index::create()
        .if_not_exists()
        .name("idx_photo_device_id")
        .table(photo::Entity)
        .col(photo::Column::DeviceId)
        .to_owned();
    db.execute_raw(backend.build(&by_device)).await?;

    info!(backend = ?backend, "Ensured photo table and indexes exist");
    Ok(())
}
