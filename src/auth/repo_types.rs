use sqlx::FromRow;
use time::OffsetDateTime;

/// User row as stored. Not serializable: the public shape is `dto::PublicUser`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,      // argon2 PHC string
    pub email: Option<String>,
    pub created_at: OffsetDateTime,
}
