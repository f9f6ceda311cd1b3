//! Run configuration: TOML file plus environment overrides.
//!
//! Configuration is read once at process start and handed explicitly to the
//! row source and the loader; neither component reads the environment on its
//! own, so both are testable with fixed parameters.

use std::path::Path;

use serde::Deserialize;

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "ingest.toml";

/// Environment variable overrides for the `[postgres]` section.
pub const ENV_PG_HOST: &str = "PG_HOST";
pub const ENV_PG_PORT: &str = "PG_PORT";
pub const ENV_PG_DB: &str = "PG_DB";
pub const ENV_PG_USER: &str = "PG_USER";
pub const ENV_PG_PASSWORD: &str = "PG_PASSWORD";

/// Environment variable overrides for the `[source]` section.
pub const ENV_MINIO_ENDPOINT: &str = "MINIO_ENDPOINT";
pub const ENV_MINIO_ACCESS_KEY: &str = "MINIO_ACCESS_KEY";
pub const ENV_MINIO_SECRET_KEY: &str = "MINIO_SECRET_KEY";
pub const ENV_MINIO_BUCKET: &str = "MINIO_BUCKET";
pub const ENV_MINIO_CSV_KEY: &str = "MINIO_CSV_KEY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSection {
    #[serde(default = "default_pg_host")]
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    #[serde(default = "default_pg_db")]
    pub dbname: String,
    #[serde(default = "default_pg_user")]
    pub user: String,
    #[serde(default = "default_pg_password")]
    pub password: String,
}

fn default_pg_host() -> String {
    "postgres".to_string()
}

fn default_pg_port() -> u16 {
    5432
}

fn default_pg_db() -> String {
    "fashion_store".to_string()
}

fn default_pg_user() -> String {
    "fashion".to_string()
}

fn default_pg_password() -> String {
    "fashion123".to_string()
}

impl Default for PostgresSection {
    fn default() -> Self {
        Self {
            host: default_pg_host(),
            port: default_pg_port(),
            dbname: default_pg_db(),
            user: default_pg_user(),
            password: default_pg_password(),
        }
    }
}

impl PostgresSection {
    /// Connection parameters for tokio-postgres.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password);
        config
    }

    /// Connection target with the password masked, for logging.
    pub fn masked(&self) -> String {
        format!(
            "postgresql://{}:****@{}:{}/{}",
            self.user, self.host, self.port, self.dbname
        )
    }
}

/// Object store settings for the raw sales file.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_access_key")]
    pub access_key: String,
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_csv_key")]
    pub csv_key: String,
}

fn default_endpoint() -> String {
    "http://minio:9000".to_string()
}

fn default_access_key() -> String {
    "minioadmin".to_string()
}

fn default_secret_key() -> String {
    "minioadmin123".to_string()
}

fn default_bucket() -> String {
    "folder-source".to_string()
}

fn default_csv_key() -> String {
    "fashion_store_sales.csv".to_string()
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_key: default_access_key(),
            secret_key: default_secret_key(),
            bucket: default_bucket(),
            csv_key: default_csv_key(),
        }
    }
}

/// Main configuration structure (`ingest.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub postgres: PostgresSection,

    #[serde(default)]
    pub source: SourceSection,
}

impl IngestConfig {
    /// Load configuration from a file path.
    ///
    /// Falls back to defaults when the file does not exist; environment
    /// variable overrides are applied either way.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(ENV_PG_HOST) {
            self.postgres.host = host;
        }
        if let Ok(port) = std::env::var(ENV_PG_PORT)
            && let Ok(port) = port.parse()
        {
            self.postgres.port = port;
        }
        if let Ok(dbname) = std::env::var(ENV_PG_DB) {
            self.postgres.dbname = dbname;
        }
        if let Ok(user) = std::env::var(ENV_PG_USER) {
            self.postgres.user = user;
        }
        if let Ok(password) = std::env::var(ENV_PG_PASSWORD) {
            self.postgres.password = password;
        }

        if let Ok(endpoint) = std::env::var(ENV_MINIO_ENDPOINT) {
            self.source.endpoint = endpoint;
        }
        if let Ok(access_key) = std::env::var(ENV_MINIO_ACCESS_KEY) {
            self.source.access_key = access_key;
        }
        if let Ok(secret_key) = std::env::var(ENV_MINIO_SECRET_KEY) {
            self.source.secret_key = secret_key;
        }
        if let Ok(bucket) = std::env::var(ENV_MINIO_BUCKET) {
            self.source.bucket = bucket;
        }
        if let Ok(csv_key) = std::env::var(ENV_MINIO_CSV_KEY) {
            self.source.csv_key = csv_key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.postgres.host, "postgres");
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.dbname, "fashion_store");
        assert_eq!(config.source.bucket, "folder-source");
        assert_eq!(config.source.csv_key, "fashion_store_sales.csv");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[postgres]
host = "db.internal"
port = 5433
dbname = "warehouse"

[source]
endpoint = "http://localhost:9000"
bucket = "sales-drop"
"#;
        let config = IngestConfig::parse(toml).unwrap();
        assert_eq!(config.postgres.host, "db.internal");
        assert_eq!(config.postgres.port, 5433);
        assert_eq!(config.postgres.dbname, "warehouse");
        // Unspecified fields keep their defaults
        assert_eq!(config.postgres.user, "fashion");
        assert_eq!(config.source.bucket, "sales-drop");
        assert_eq!(config.source.csv_key, "fashion_store_sales.csv");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = IngestConfig::parse("").unwrap();
        assert_eq!(config.postgres.host, "postgres");
        assert_eq!(config.source.endpoint, "http://minio:9000");
    }

    #[test]
    fn test_masked_connection_string_hides_password() {
        let config = PostgresSection::default();
        let masked = config.masked();
        assert!(masked.contains("****"));
        assert!(!masked.contains("fashion123"));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig::load(&dir.path().join("ingest.toml")).unwrap();
        assert_eq!(config.postgres.dbname, "fashion_store");
    }
}
