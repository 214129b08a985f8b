use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod engine;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::leaderboard_routes())
}
