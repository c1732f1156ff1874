use anyhow::Result;
use serde::Deserialize;
use anyhow::{anyhow, Context};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Base used for hypermedia links when a request carries no `Host` header.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), public_base_url: None }
    }
}

/// Which Movie Store backs the service.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown store backend `{other}` (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_run_migrations() -> bool { true }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, environment variables otherwise; always validated.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path(), |key| std::env::var(key).ok())
    }

    /// Only a missing file falls back to `lookup`; an unreadable or malformed file is an error.
    pub fn load_and_validate_from(path: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => from_toml_str(&content).with_context(|| format!("invalid config file `{path}`"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_lookup(lookup)?,
            Err(e) => return Err(anyhow!("cannot read config file `{path}`: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup (environment-style variable names).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(host) = get("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = get("SERVER_PORT") {
            cfg.server.port = port
                .parse::<u16>()
                .map_err(|e| anyhow!("SERVER_PORT `{port}` is not a valid port: {e}"))?;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = w.parse::<usize>().ok();
        }
        cfg.server.public_base_url = get("PUBLIC_BASE_URL");
        if let Some(backend) = get("MOVIE_STORE") {
            cfg.store.backend = backend.parse()?;
        }
        if let Some(url) = get("DATABASE_URL") {
            cfg.database.url = url;
        }
        if let Some(format) = get("LOG_FORMAT") {
            cfg.logging.format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Compact,
            };
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.store.backend == StoreBackend::Postgres {
            self.database.normalize_from_env();
            self.database.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    /// Fallback link base: the configured public URL, else `http://host:port`.
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.host, self.port),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.normalize_from_env();
        cfg
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_full_toml() {
        let cfg = from_toml_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            public_base_url = "https://movies.example.com/"

            [store]
            backend = "memory"

            [database]
            url = "postgres://u:p@db:5432/movies"
            max_connections = 20

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.database.max_connections, 20);
        assert_eq!(cfg.database.min_connections, 2);
        assert!(cfg.database.run_migrations);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.server.public_base_url(), "https://movies.example.com");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = from_toml_str("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.store.backend, StoreBackend::Postgres);
        assert_eq!(cfg.server.public_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn lookup_builds_memory_config() {
        let vars: HashMap<&str, &str> = [
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "3000"),
            ("MOVIE_STORE", "memory"),
            ("LOG_FORMAT", "JSON"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn lookup_rejects_bad_port_and_backend() {
        assert!(AppConfig::from_lookup(|k| (k == "SERVER_PORT").then(|| "http".to_string())).is_err());
        assert!(AppConfig::from_lookup(|k| (k == "MOVIE_STORE").then(|| "redis".to_string())).is_err());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = from_toml_str("[server]\nhost = \"\"\nport = 0\n[store]\nbackend = \"memory\"").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("movie-api-{}-{}.toml", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let typo = temp_config("typo", "[store]\nbackend = \"memroy\"\n");
        let res = AppConfig::load_and_validate_from(typo.to_str().unwrap(), |k| (k == "MOVIE_STORE").then(|| "memory".to_string()));
        assert!(res.is_err());

        let broken = temp_config("broken", "[server\nport = 1");
        assert!(AppConfig::load_and_validate_from(broken.to_str().unwrap(), |_| None).is_err());

        let _ = std::fs::remove_file(typo);
        let _ = std::fs::remove_file(broken);
    }

    #[test]
    fn missing_file_falls_back_to_lookup() {
        let missing = std::env::temp_dir().join(format!("movie-api-{}-absent.toml", std::process::id()));
        let cfg = AppConfig::load_and_validate_from(missing.to_str().unwrap(), |k| match k {
            "MOVIE_STORE" => Some("memory".to_string()),
            "SERVER_PORT" => Some("3001".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.server.port, 3001);
    }

    #[test]
    fn valid_file_is_loaded_and_validated() {
        let path = temp_config("valid", "[server]\nhost = \"\"\nport = 8181\n[store]\nbackend = \"memory\"\n");
        let cfg = AppConfig::load_and_validate_from(path.to_str().unwrap(), |_| None).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8181);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn database_validation() {
        let mut db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        db.url = "postgres://u:p@localhost/movies".into();
        assert!(db.validate().is_ok());
        db.min_connections = 0;
        assert!(db.validate().is_err());
        db.min_connections = 5;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }
}
