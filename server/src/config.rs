use anyhow::{Result, anyhow};
use platform_db::DatabaseSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub service_name: String,
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let service_name =
            std::env::var("SERVICE_NAME").unwrap_or_else(|_| "employee-directory".into());

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer"))?,
            Err(_) => 10,
        };
        let sql_logging = std::env::var("DATABASE_LOG_SQL")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let database = DatabaseSettings::from_env()
            .max_connections(max_connections)
            .sql_logging(sql_logging);

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let otlp_endpoint = std::env::var("OTLP_ENDPOINT")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            service_name,
            database,
            cors_allowed_origins,
            otlp_endpoint,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
