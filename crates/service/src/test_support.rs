#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_with_config;
use configs::DatabaseConfig;

/// Fresh, migrated in-memory SQLite database; every call is isolated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut cfg = DatabaseConfig { url: "sqlite::memory:".to_string(), ..DatabaseConfig::default() };
    // one connection, otherwise each pooled connection sees its own empty database
    cfg.max_connections = 1;
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
