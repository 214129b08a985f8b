use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    scores::{
        dto::SubmitScoreRequest,
        repo_types::{NewScore, ScoreRecord},
    },
};

pub const DEFAULT_USER_SCORES_LIMIT: i64 = 20;

/// Checks presence of the required fields. Zero is a valid time and a valid
/// score; only absence counts as missing.
pub fn validate_submission(req: SubmitScoreRequest) -> AppResult<NewScore> {
    let level_type = req.level_type.filter(|t| !t.trim().is_empty());

    let mut missing = Vec::new();
    if req.user_id.is_none() {
        missing.push("user_id");
    }
    if level_type.is_none() {
        missing.push("level_type");
    }
    if req.completion_time.is_none() {
        missing.push("completion_time");
    }
    if req.score.is_none() {
        missing.push("score");
    }

    let (Some(user_id), Some(level_type), Some(completion_time), Some(score)) =
        (req.user_id, level_type, req.completion_time, req.score)
    else {
        return Err(AppError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    };

    if !completion_time.is_finite() || completion_time < 0.0 {
        return Err(AppError::validation(
            "completion_time must be a non-negative number of seconds",
        ));
    }

    Ok(NewScore {
        user_id,
        level_type,
        level_number: req.level_number,
        completion_time,
        score,
        difficulty: req.difficulty.filter(|d| !d.is_empty()),
    })
}

/// Records one run for an existing user and returns its public view.
///
/// The owner check is the `user_id` foreign key on a single autocommit insert.
pub async fn submit_score(db: &SqlitePool, req: SubmitScoreRequest) -> AppResult<ScoreRecord> {
    let new_score = validate_submission(req)?;
    let user_id = new_score.user_id;

    let id = new_score.insert(db).await.map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                warn!(user_id, "score for unknown user");
                return user_not_found();
            }
        }
        AppError::from(e)
    })?;

    // Only a cascade from deleting the owner removes a score.
    let record = ScoreRecord::find_by_id(db, id)
        .await?
        .ok_or_else(user_not_found)?;

    info!(
        score_id = record.id,
        user_id = record.user_id,
        level_type = %record.level_type,
        score = record.score,
        "score recorded"
    );
    Ok(record)
}

/// The user together with their scores, newest first.
pub async fn user_scores(
    db: &SqlitePool,
    user_id: i64,
    level_type: Option<&str>,
    limit: i64,
) -> AppResult<(User, Vec<ScoreRecord>)> {
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or_else(user_not_found)?;
    let level_type = level_type.filter(|t| !t.is_empty());
    let scores = ScoreRecord::list_by_user(db, user_id, level_type, limit).await?;
    Ok((user, scores))
}

fn user_not_found() -> AppError {
    AppError::NotFound("user not found".into())
}
