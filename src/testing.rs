//! Fixtures for store-backed tests. Users are inserted directly with a dummy
//! hash so fixtures don't pay for argon2.

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::{
    auth::repo_types::User, config::AppConfig, scores::repo_types::NewScore, state::AppState,
};

/// WAL database file inside `dir`, opened through the production connect path
/// with a multi-connection pool. Use it where writers must actually race.
pub(crate) async fn file_backed_state(dir: &TempDir) -> AppState {
    let path = dir.path().join("scoreboard.db");
    AppState::connect(AppConfig {
        database_url: format!("sqlite://{}", path.display()),
        max_connections: 5,
        leaderboard_max_limit: 100,
        seed_demo_data: false,
    })
    .await
    .expect("file-backed store connects")
}

pub(crate) async fn insert_user(db: &SqlitePool, username: &str) -> i64 {
    User::create(db, username, "not-a-real-hash", None)
        .await
        .expect("insert user")
        .id
}

pub(crate) async fn insert_score(
    db: &SqlitePool,
    user_id: i64,
    level_type: &str,
    level_number: Option<i64>,
    completion_time: f64,
    score: i64,
    difficulty: Option<&str>,
) -> i64 {
    NewScore {
        user_id,
        level_type: level_type.into(),
        level_number,
        completion_time,
        score,
        difficulty: difficulty.map(Into::into),
    }
    .insert(db)
    .await
    .expect("insert score")
}
