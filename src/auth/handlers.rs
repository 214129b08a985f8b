use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        services,
    },
    error::AppResult,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = services::register(
        &state.db,
        payload.username.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
        payload.email.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "registration successful",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = services::login(
        &state.db,
        payload.username.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(AuthResponse {
        message: "login successful",
        user: user.into(),
    }))
}
