use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::config::AppConfig;

/// How long a writer waits for the write lock before failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::connect(config).await
    }

    /// Opens the pool and brings the schema up to date before any request is served.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("parse DATABASE_URL {}", config.database_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let db = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let state = Self::from_parts(db, Arc::new(config));
        state.migrate().await?;
        info!(database_url = %state.config.database_url, "database ready");
        Ok(state)
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }

    pub async fn teardown(self) {
        self.db.close().await;
        info!("database pool closed");
    }

    /// Fresh in-memory store with the schema applied.
    ///
    /// A single connection that never expires: every connection to `:memory:`
    /// would otherwise see its own empty database.
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("memory url parses")
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("memory pool connects");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            leaderboard_max_limit: 100,
            seed_demo_data: false,
        });
        let state = Self::from_parts(db, config);
        state.migrate().await.expect("migrations apply");
        state
    }
}
