use sqlx::{Executor, Sqlite};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

impl User {
    pub async fn find_by_id<'e, E>(db: E, id: i64) -> sqlx::Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_username<'e, E>(db: E, username: &str) -> sqlx::Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn create<'e, E>(
        db: E,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> sqlx::Result<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password_hash, email, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Removes the user; their scores go with them through `ON DELETE CASCADE`.
    /// Returns whether a row was deleted.
    pub async fn delete<'e, E>(db: E, id: i64) -> sqlx::Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn count<'e, E>(db: E) -> sqlx::Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
    }
}
