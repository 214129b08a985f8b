use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    error::AppResult,
    extract::ApiQuery,
    leaderboard::{
        dto::{LeaderboardQuery, LeaderboardResponse},
        engine::{self, LeaderboardFilter, DEFAULT_LIMIT},
    },
    pagination::clamp_limit,
    state::AppState,
};

pub fn leaderboard_routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(get_leaderboard))
}

#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<LeaderboardQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    let filter = LeaderboardFilter::parse(
        q.level_type.as_deref(),
        q.level_number.as_deref(),
        q.difficulty.as_deref(),
    )?;
    let limit = clamp_limit(q.limit, DEFAULT_LIMIT, state.config.leaderboard_max_limit);

    let board = engine::query(&state.db, &filter, limit).await?;
    let total_count = board.total_count();
    debug!(?filter, limit, total_count, "leaderboard served");

    Ok(Json(LeaderboardResponse {
        leaderboard: board.entries,
        total_count,
    }))
}
