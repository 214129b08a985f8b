use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound applied to any caller-supplied `limit`.
    pub leaderboard_max_limit: i64,
    /// Reload the demo accounts and their scores at startup.
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://game_data.db?mode=rwc".into());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);
        let leaderboard_max_limit = std::env::var("LEADERBOARD_MAX_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(500);
        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        anyhow::ensure!(max_connections > 0, "DATABASE_MAX_CONNECTIONS must be positive");
        anyhow::ensure!(leaderboard_max_limit >= 0, "LEADERBOARD_MAX_LIMIT must not be negative");

        Ok(Self {
            database_url,
            max_connections,
            leaderboard_max_limit,
            seed_demo_data,
        })
    }
}
