use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file at `$CONFIG_PATH` (default `config.toml`); environment only when that file is absent.
pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from(&configs::config_path())
}

pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    match AppConfig::load_from(path)? {
        Some(cfg) => {
            info!(%path, "configuration loaded from file");
            Ok(cfg)
        }
        None => {
            warn!(%path, "config file not found; using environment");
            AppConfig::from_env().context("no config file and no usable SERVER_*/DATABASE_URL environment")
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Connect, migrate and assemble the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await.context("apply migrations")?;
        info!("migrations applied");
    }
    let state = ServerState::from_db(db, &cfg.products);
    Ok(routes::build_router(state, build_cors()))
}

/// Build the app for `cfg` and run the HTTP server until Ctrl+C.
/// Logging and `.env` loading are the caller's job.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, seeded_ids = cfg.products.id_seed.is_some(), "starting product api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("product-api-startup-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn invalid_config_file_is_not_replaced_by_env() {
        std::env::set_var("DATABASE_URL", "postgres://env/db");
        let path = write_temp("invalid", "[server]\nhost = \"0.0.0.0\"\nport = 0\n");
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn missing_config_file_falls_back_to_env() {
        std::env::set_var("DATABASE_URL", "postgres://env/db");
        let cfg = load_config_from("/nonexistent/product-api/config.toml").unwrap();
        assert_eq!(cfg.database.url, "postgres://env/db");
    }

    #[tokio::test]
    async fn builds_app_on_sqlite() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        cfg.database.max_connections = 1;
        cfg.database.min_connections = 1;
        assert!(build_app(&cfg).await.is_ok());
    }
}
