mod app;
mod auth;
mod config;
mod error;
mod extract;
mod leaderboard;
mod pagination;
mod scores;
mod seed;
mod state;
mod stats;
#[cfg(test)]
mod testing;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "scoreboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Connects and applies migrations before anything is served.
    let app_state = AppState::init().await?;

    if app_state.config.seed_demo_data {
        seed::seed_demo_data(&app_state.db).await?;
    }

    let served = app::serve(app::build_app(app_state.clone())).await;
    app_state.teardown().await;
    served
}
