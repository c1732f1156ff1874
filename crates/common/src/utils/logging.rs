use std::io;
use tracing_subscriber::{fmt, EnvFilter};

// sqlx logs every statement at info; keep it to warnings unless RUST_LOG asks for more
const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing subscriber with compact output on stdout.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info,sqlx=warn`
/// - Safe to call more than once; later calls are no-ops
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output on stdout.
/// - Same filter rules as `init_logging_default`
/// - One JSON object per line, for log collectors in containers
pub fn init_logging_json() {
    // try_init: the binary may already have installed the compact subscriber
    // while reporting a config error
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
