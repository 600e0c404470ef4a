use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS; no CORS layer when unset
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Where users and administrators are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    /// Process-local tables, lost on shutdown
    #[serde(alias = "in-memory", alias = "in_memory", alias = "inmemory")]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `DATABASE_URL` is used when unset
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

/// Argon2 work factor for administrator passwords
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Ignore the administrator's own row when checking email uniqueness on
    /// update
    pub admin_email_check_excludes_self: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_url: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl DatabaseConfig {
    /// Configured URL, falling back to the `DATABASE_URL` environment variable
    pub fn resolve_url(&self) -> Option<String> {
        self.url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.frontend_url.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.security.memory_kib, 19456);
        assert!(!config.directory.admin_email_check_excludes_self);
    }

    #[test]
    fn test_partial_sources_keep_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 4000)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .set_override("directory.admin_email_check_excludes_self", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!(config.directory.admin_email_check_excludes_self);
        assert_eq!(config.security.iterations, 2);
    }

    #[test]
    fn test_storage_backend_aliases() {
        for (raw, expected) in [
            ("postgres", StorageBackend::Postgres),
            ("pg", StorageBackend::Postgres),
            ("memory", StorageBackend::Memory),
            ("in-memory", StorageBackend::Memory),
        ] {
            let config: AppConfig = config::Config::builder()
                .set_override("storage.backend", raw)
                .unwrap()
                .build()
                .unwrap()
                .try_deserialize()
                .unwrap();
            assert_eq!(config.storage.backend, expected, "backend {}", raw);
        }
    }

    #[test]
    fn test_configured_url_wins() {
        let database = DatabaseConfig {
            url: Some("postgres://db/directory".to_string()),
            ..Default::default()
        };
        assert_eq!(
            database.resolve_url().as_deref(),
            Some("postgres://db/directory")
        );
    }
}
