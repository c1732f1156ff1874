use configs::LogFormat;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Json => common::utils::logging::init_logging_json(),
        LogFormat::Compact => common::utils::logging::init_logging_default(),
    }
    info!(service = "movie-api", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // load .env before reading config and RUST_LOG
    dotenv().ok();

    // config.toml (or CONFIG_PATH) first, environment variables when the file is absent
    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            // no config means no log format yet; report with the default subscriber
            common::utils::logging::init_logging_default();
            error!(service = "movie-api", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    // process context for start/stop/panic events (nothing sensitive)
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // panics land in the log with the process context attached
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "movie-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // worker_threads is always Some after normalization (defaults to 4)
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "movie-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    // start event
    info!(
        service = "movie-api",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "movie api starting"
    );

    // run blocks until Ctrl+C, then drains in-flight requests
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "movie-api", event = "stop", %service_id, pid, "server stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "movie-api", event = "run_failed", %service_id, error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
