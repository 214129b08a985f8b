use serde::{Deserialize, Serialize};

use crate::{auth::dto::PublicUser, scores::repo_types::ScoreRecord};

/// Score submission body. Every field is optional at the wire level so that
/// missing required fields are reported as a validation error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubmitScoreRequest {
    pub user_id: Option<i64>,
    pub level_type: Option<String>,
    pub completion_time: Option<f64>,
    pub score: Option<i64>,
    pub level_number: Option<i64>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub message: &'static str,
    pub score: ScoreRecord,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserScoresQuery {
    pub level_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserScoresResponse {
    pub user: PublicUser,
    pub scores: Vec<ScoreRecord>,
}
