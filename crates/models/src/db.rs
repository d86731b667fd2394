use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use configs::DatabaseConfig;

/// Connect using pool settings from the application config.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    // an in-memory sqlite database lives only as long as its connection
    if !(cfg.is_sqlite() && cfg.url.contains(":memory:")) {
        opts.idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}
