//! Database primitives shared by the server and the integration tests.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (env {0})")]
    MissingUrl(String),
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default)]
    sql_logging: bool,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(default_url_key())
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            url: None,
            max_connections: default_max_connections(),
            sql_logging: false,
        }
    }

    /// Settings that read the url from `DATABASE_URL`.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Settings with an explicit url; the env key is ignored.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn sql_logging(mut self, enabled: bool) -> Self {
        self.sql_logging = enabled;
        self
    }

    pub fn database_url(&self) -> DbResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone()))
    }

    fn connect_options(&self) -> DbResult<ConnectOptions> {
        let url = self.database_url()?;
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(self.sql_logging);
        Ok(options)
    }
}

/// Open a pooled connection using the given settings.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let options = settings.connect_options()?;
    let pool = Database::connect(options).await.map_err(DbError::Connect)?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

/// Round-trip a trivial query; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
