use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // load .env before the subscriber reads RUST_LOG / LOG_FORMAT
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "product_api", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "product_api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match server::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "product_api", event = "config_invalid", error = ?e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "product_api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "product_api",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "product api starting"
    );

    // server::serve handles Ctrl+C itself and returns after draining
    rt.block_on(async move {
        match server::serve(cfg).await {
            Ok(()) => {
                info!(service = "product_api", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "product_api", event = "run_failed", error = %e, "server::serve returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
