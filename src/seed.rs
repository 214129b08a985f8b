//! Demo data set: four accounts and a spread of runs across the three modes.
//!
//! Seeding replaces the demo accounts if they already exist (their old scores
//! go with them), then recreates them through the regular register and submit
//! paths.

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    auth::{repo_types::User, services::register},
    scores::{dto::SubmitScoreRequest, services::submit_score},
};

const DEMO_USERS: [(&str, &str); 4] = [
    ("player1", "123456"),
    ("player2", "123456"),
    ("player3", "123456"),
    ("admin", "admin123"),
];

/// (player index, level type, level number, completion time, score, difficulty)
type DemoScore = (usize, &'static str, Option<i64>, f64, i64, &'static str);

const DEMO_SCORES: [DemoScore; 14] = [
    (0, "standard", Some(1), 15.5, 850, "easy"),
    (0, "standard", Some(2), 22.3, 780, "easy"),
    (0, "standard", Some(3), 35.8, 650, "medium"),
    (1, "standard", Some(1), 12.8, 920, "easy"),
    (1, "standard", Some(2), 18.9, 860, "easy"),
    (1, "standard", Some(4), 45.2, 580, "hard"),
    (2, "standard", Some(1), 20.1, 750, "easy"),
    (2, "standard", Some(2), 28.5, 680, "medium"),
    (0, "challenge", None, 65.3, 1200, "hard"),
    (1, "challenge", None, 58.7, 1350, "hard"),
    (2, "challenge", None, 72.1, 1100, "hard"),
    (0, "custom", None, 30.2, 800, "medium"),
    (1, "custom", None, 25.8, 900, "medium"),
    (2, "custom", None, 40.5, 700, "easy"),
];

pub async fn seed_demo_data(db: &SqlitePool) -> anyhow::Result<()> {
    let mut ids = Vec::with_capacity(DEMO_USERS.len());
    for (username, password) in DEMO_USERS {
        if let Some(existing) = User::find_by_username(db, username).await? {
            User::delete(db, existing.id)
                .await
                .with_context(|| format!("remove previous demo user {username}"))?;
        }
        let email = format!("{username}@example.com");
        let user = register(db, username, password, Some(&email))
            .await
            .with_context(|| format!("register demo user {username}"))?;
        ids.push(user.id);
    }

    for (player, level_type, level_number, completion_time, score, difficulty) in DEMO_SCORES {
        let user_id = *ids
            .get(player)
            .with_context(|| format!("demo score refers to missing player {player}"))?;
        submit_score(
            db,
            SubmitScoreRequest {
                user_id: Some(user_id),
                level_type: Some(level_type.into()),
                completion_time: Some(completion_time),
                score: Some(score),
                level_number,
                difficulty: Some(difficulty.into()),
            },
        )
        .await
        .context("submit demo score")?;
    }

    info!(
        users = DEMO_USERS.len(),
        scores = DEMO_SCORES.len(),
        "demo data seeded"
    );
    Ok(())
}
