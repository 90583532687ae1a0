use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

pub mod entities;
pub mod gateway;

pub use gateway::SeaOrmGateway;

/// Re-export for convenience
pub use sea_orm;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Read connection settings from the environment.
    ///
    /// `DATABASE_URL` wins when set. Otherwise the URL is assembled from
    /// `DATABASE_HOST`, `DATABASE_USER`, `DATABASE_PASSWORD` and
    /// `DATABASE_NAME`, the latter defaulting to `default_name`.
    pub fn from_env(default_name: &str) -> Self {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            postgres_url(
                &env::var("DATABASE_HOST").unwrap_or_else(|_| "127.0.0.1:5432".to_string()),
                &env::var("DATABASE_USER").unwrap_or_else(|_| "postgres".to_string()),
                &env::var("DATABASE_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
                &env::var("DATABASE_NAME").unwrap_or_else(|_| default_name.to_string()),
            )
        });

        Self {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            connect_timeout_secs: env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            idle_timeout_secs: env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}

pub fn postgres_url(host: &str, user: &str, password: &str, name: &str) -> String {
    format!("postgres://{user}:{password}@{host}/{name}")
}

/// Application state shared across handlers
#[cfg_attr(not(any(test, feature = "mock")), derive(Clone))]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn gateway(&self) -> SeaOrmGateway<'_> {
        SeaOrmGateway::new(&self.db)
    }
}

/// Connect to the database and return a connection pool
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.url);
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Database::connect(opt).await
}
