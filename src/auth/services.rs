use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::User,
    },
    error::{AppError, AppResult},
};

const USERNAME_TAKEN: &str = "username already exists";
const EMAIL_TAKEN: &str = "email already registered";

/// Creates a user, or fails with `Conflict` if the username or email is taken.
///
/// Uniqueness rests on the table's `UNIQUE` constraints and a single
/// autocommit insert: racing registrations queue on the write lock and every
/// loser gets `Conflict`. Don't wrap this in a read-then-write transaction;
/// SQLite fails the lock upgrade with `SQLITE_BUSY` rather than waiting.
pub async fn register(
    db: &SqlitePool,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> AppResult<User> {
    let username = username.trim();
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("username and password are required"));
    }

    let hash = hash_password_blocking(password.to_owned()).await?;

    let user = User::create(db, username, &hash, email)
        .await
        .map_err(conflict_from_unique)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Verifies credentials. Unknown user and wrong password both yield `AppError::Auth`.
pub async fn login(db: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("username and password are required"));
    }

    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::Auth);
    };

    if !verify_password_blocking(password.to_owned(), user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth);
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(user)
}

fn conflict_from_unique(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let msg = if db_err.message().contains("users.email") {
                EMAIL_TAKEN
            } else {
                USERNAME_TAKEN
            };
            warn!(reason = msg, "registration rejected");
            return AppError::Conflict(msg.into());
        }
    }
    e.into()
}
