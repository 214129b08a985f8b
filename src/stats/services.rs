use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    auth::repo_types::User,
    scores::repo_types::{ScoreRecord, SCORE_VIEW_SELECT},
};

/// Modes broken out in `mode_stats`. Level types are open-ended elsewhere;
/// anything not listed here is counted in `total_scores` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Standard,
    Custom,
    Challenge,
}

impl GameMode {
    pub const TRACKED: [GameMode; 3] = [GameMode::Standard, GameMode::Custom, GameMode::Challenge];

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::Custom => "custom",
            GameMode::Challenge => "challenge",
        }
    }

    pub fn from_level_type(level_type: &str) -> Option<Self> {
        Self::TRACKED.into_iter().find(|m| m.as_str() == level_type)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ModeStats {
    pub standard: i64,
    pub custom: i64,
    pub challenge: i64,
}

impl ModeStats {
    fn slot(&mut self, mode: GameMode) -> &mut i64 {
        match mode {
            GameMode::Standard => &mut self.standard,
            GameMode::Custom => &mut self.custom,
            GameMode::Challenge => &mut self.challenge,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_users: i64,
    pub total_scores: i64,
    pub mode_stats: ModeStats,
    pub highest_score: Option<ScoreRecord>,
}

/// Aggregates over one read transaction so the counts agree with each other.
pub async fn collect(db: &SqlitePool) -> sqlx::Result<Stats> {
    let mut tx = db.begin().await?;

    let total_users = User::count(&mut *tx).await?;
    let total_scores = ScoreRecord::count(&mut *tx).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT level_type, COUNT(*) FROM scores WHERE level_type IN (",
    );
    let mut modes = qb.separated(", ");
    for mode in GameMode::TRACKED {
        modes.push_bind(mode.as_str());
    }
    qb.push(") GROUP BY level_type");
    let per_mode: Vec<(String, i64)> = qb.build_query_as().fetch_all(&mut *tx).await?;

    let mut mode_stats = ModeStats::default();
    for (level_type, count) in per_mode {
        if let Some(mode) = GameMode::from_level_type(&level_type) {
            *mode_stats.slot(mode) = count;
        }
    }

    // Ties on the maximum go to the earliest submission.
    let mut qb = QueryBuilder::<Sqlite>::new(SCORE_VIEW_SELECT);
    qb.push(" ORDER BY s.score DESC, s.id ASC LIMIT 1");
    let highest_score = qb
        .build_query_as::<ScoreRecord>()
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Stats {
        total_users,
        total_scores,
        mode_stats,
        highest_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::AppState,
        testing::{insert_score, insert_user},
    };

    #[tokio::test]
    async fn empty_store() {
        let st = AppState::for_tests().await;
        let stats = collect(&st.db).await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_scores, 0);
        assert_eq!(stats.mode_stats, ModeStats::default());
        assert!(stats.highest_score.is_none());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["highest_score"].is_null());
    }

    #[tokio::test]
    async fn untracked_modes_only_count_towards_the_total() {
        let st = AppState::for_tests().await;
        let a = insert_user(&st.db, "a").await;
        insert_user(&st.db, "b").await;
        insert_score(&st.db, a, "standard", Some(1), 10.0, 100, None).await;
        insert_score(&st.db, a, "standard", Some(2), 10.0, 200, None).await;
        insert_score(&st.db, a, "custom", None, 10.0, 300, None).await;
        insert_score(&st.db, a, "challenge", None, 10.0, 400, None).await;
        insert_score(&st.db, a, "zen", None, 10.0, 50, None).await;

        let stats = collect(&st.db).await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_scores, 5);
        assert_eq!(
            stats.mode_stats,
            ModeStats {
                standard: 2,
                custom: 1,
                challenge: 1
            }
        );
        let m = &stats.mode_stats;
        assert_eq!(stats.total_scores, m.standard + m.custom + m.challenge + 1);
    }

    #[tokio::test]
    async fn highest_score_prefers_earliest_on_tie() {
        let st = AppState::for_tests().await;
        let a = insert_user(&st.db, "a").await;
        let b = insert_user(&st.db, "b").await;
        insert_score(&st.db, a, "custom", None, 10.0, 900, None).await;
        let first_top = insert_score(&st.db, b, "challenge", None, 58.7, 1350, None).await;
        insert_score(&st.db, a, "challenge", None, 40.0, 1350, None).await;

        let top = collect(&st.db).await.unwrap().highest_score.unwrap();
        assert_eq!(top.id, first_top);
        assert_eq!(top.username, "b");
        assert_eq!(top.score, 1350);
    }

    #[test]
    fn level_type_lookup_is_exact() {
        assert_eq!(GameMode::from_level_type("custom"), Some(GameMode::Custom));
        assert_eq!(GameMode::from_level_type("Custom"), None);
        assert_eq!(GameMode::from_level_type("all"), None);
    }
}
