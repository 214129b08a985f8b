use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Projection shared by every read of the public score view. The owner's
/// username is joined in at read time rather than stored on the row.
pub(crate) const SCORE_VIEW_SELECT: &str = r#"
    SELECT s.id, s.user_id, u.username, s.level_type, s.level_number,
           s.completion_time, s.score, s.difficulty, s.created_at
    FROM scores s
    JOIN users u ON u.id = s.user_id
"#;

/// Public view of a score row.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct ScoreRecord {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub level_type: String,
    pub level_number: Option<i64>,
    pub completion_time: f64, // seconds
    pub score: i64,
    pub difficulty: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated submission, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScore {
    pub user_id: i64,
    pub level_type: String,
    pub level_number: Option<i64>,
    pub completion_time: f64,
    pub score: i64,
    pub difficulty: Option<String>,
}
