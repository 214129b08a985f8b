use sqlx::{Executor, QueryBuilder, Sqlite};
use time::OffsetDateTime;

use crate::scores::repo_types::{NewScore, ScoreRecord, SCORE_VIEW_SELECT};

impl NewScore {
    /// Appends the row and returns its id. Scores are never updated afterwards.
    pub async fn insert<'e, E>(&self, db: E) -> sqlx::Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(
            r#"
            INSERT INTO scores
                (user_id, level_type, level_number, completion_time, score, difficulty, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(self.user_id)
        .bind(self.level_type.as_str())
        .bind(self.level_number)
        .bind(self.completion_time)
        .bind(self.score)
        .bind(self.difficulty.as_deref())
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }
}

impl ScoreRecord {
    pub async fn find_by_id<'e, E>(db: E, id: i64) -> sqlx::Result<Option<ScoreRecord>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(SCORE_VIEW_SELECT);
        qb.push(" WHERE s.id = ").push_bind(id);
        qb.build_query_as::<ScoreRecord>().fetch_optional(db).await
    }

    /// A user's scores, most recent first. Recency is the id: `created_at` is
    /// RFC 3339 text with trimmed fractional digits and doesn't sort by time.
    pub async fn list_by_user<'e, E>(
        db: E,
        user_id: i64,
        level_type: Option<&str>,
        limit: i64,
    ) -> sqlx::Result<Vec<ScoreRecord>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(SCORE_VIEW_SELECT);
        qb.push(" WHERE s.user_id = ").push_bind(user_id);
        if let Some(level_type) = level_type {
            qb.push(" AND s.level_type = ").push_bind(level_type.to_owned());
        }
        qb.push(" ORDER BY s.id DESC LIMIT ").push_bind(limit);
        qb.build_query_as::<ScoreRecord>().fetch_all(db).await
    }

    pub async fn count<'e, E>(db: E) -> sqlx::Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM scores")
            .fetch_one(db)
            .await
    }
}
