use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    error::AppResult,
    state::AppState,
    stats::services::{self, Stats},
};

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<Stats>> {
    Ok(Json(services::collect(&state.db).await?))
}
