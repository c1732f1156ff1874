use std::{future::Future, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreBackend};
use migration::MigratorTrait;
use service::movie::{
    repo::seaorm::SeaOrmMovieRepository,
    repository::memory::InMemoryMovieRepository,
    MovieRepository,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::links::LinkBuilder;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load and validate configuration (config file first, environment otherwise)
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Construct the Movie Store selected by `[store] backend`
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn MovieRepository>, StartupError> {
    match cfg.store.backend {
        StoreBackend::Memory => {
            warn!("using in-memory movie store; data is lost on shutdown");
            Ok(Arc::new(InMemoryMovieRepository::default()))
        }
        StoreBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Runtime(format!("cannot connect to database: {e}")))?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
                info!("database migrations applied");
            }
            Ok(Arc::new(SeaOrmMovieRepository { db }))
        }
    }
}

/// Router over the given store, with CORS and request tracing layers
pub fn build_app(repo: Arc<dyn MovieRepository>, links: LinkBuilder) -> Router {
    routes::build_router(ServerState::new(repo, links), build_cors())
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only via process termination");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let repo = build_repository(&cfg).await?;
    let app = build_app(repo, LinkBuilder::new(cfg.server.public_base_url()));

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|e| StartupError::Runtime(format!("cannot bind {}:{}: {e}", cfg.server.host, cfg.server.port)))?;
    let addr = listener.local_addr().map_err(anyhow::Error::from)?;
    info!(%addr, backend = ?cfg.store.backend, "starting movie api");

    serve(listener, app, ctrl_c()).await?;
    Ok(())
}
