use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::clamp_limit,
    scores::{
        dto::{ScoreResponse, SubmitScoreRequest, UserScoresQuery, UserScoresResponse},
        services::{self, DEFAULT_USER_SCORES_LIMIT},
    },
    state::AppState,
};

pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/scores", post(submit_score))
        .route("/user/:user_id/scores", get(user_scores))
}

#[instrument(skip(state, payload))]
pub async fn submit_score(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitScoreRequest>,
) -> AppResult<(StatusCode, Json<ScoreResponse>)> {
    let score = services::submit_score(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ScoreResponse {
            message: "score uploaded",
            score,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn user_scores(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(q): ApiQuery<UserScoresQuery>,
) -> AppResult<Json<UserScoresResponse>> {
    let limit = clamp_limit(
        q.limit,
        DEFAULT_USER_SCORES_LIMIT,
        state.config.leaderboard_max_limit,
    );
    let (user, scores) =
        services::user_scores(&state.db, user_id, q.level_type.as_deref(), limit).await?;
    Ok(Json(UserScoresResponse {
        user: user.into(),
        scores,
    }))
}
