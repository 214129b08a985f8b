use serde::{Deserialize, Serialize};

use crate::leaderboard::engine::RankedScore;

/// Query string of `GET /leaderboard`. `level_number` stays a string so an
/// empty value can mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub level_type: Option<String>,
    pub level_number: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<RankedScore>,
    /// Number of entries in `leaderboard`, i.e. after the limit was applied.
    pub total_count: usize,
}
