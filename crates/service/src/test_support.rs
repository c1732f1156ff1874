#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use configs::DatabaseConfig;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// A fresh migrated connection, or `None` when `SKIP_DB_TESTS` is set or the database is unreachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }

    let migrated = *MIGRATED
        .get_or_init(|| async {
            let cfg = DatabaseConfig::from_env();
            match connect_with_config(&cfg).await {
                Ok(db) => match migration::Migrator::up(&db, None).await {
                    Ok(()) => true,
                    Err(e) => { eprintln!("skip: migrate up failed: {}", e); false }
                },
                Err(e) => { eprintln!("skip: cannot connect to db: {}", e); false }
            }
        })
        .await;
    if !migrated {
        return None;
    }

    // Return a fresh connection for the current test's runtime
    let mut cfg = DatabaseConfig::from_env();
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    connect_with_config(&cfg).await.ok()
}
