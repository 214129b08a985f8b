//! Filtering, ordering and ranking of score records.
//!
//! Ordering is `score` descending, then `completion_time` ascending, then `id`
//! ascending. Ids are assigned in insertion order, so exact ties on the first
//! two keys resolve to the earlier submission and repeated queries over an
//! unchanged store always agree.

use serde::Serialize;
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    error::{AppError, AppResult},
    scores::repo_types::{ScoreRecord, SCORE_VIEW_SELECT},
};

/// `level_type` value that disables the level type filter.
pub const ALL_LEVEL_TYPES: &str = "all";
pub const DEFAULT_LIMIT: i64 = 50;

const RANKING_ORDER: &str = " ORDER BY s.score DESC, s.completion_time ASC, s.id ASC";

/// Conjunction of exact-match filters. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardFilter {
    pub level_type: Option<String>,
    pub level_number: Option<i64>,
    pub difficulty: Option<String>,
}

impl LeaderboardFilter {
    /// Builds a filter from raw query values. Absent and empty values, and a
    /// level type of `"all"`, leave that dimension unfiltered.
    pub fn parse(
        level_type: Option<&str>,
        level_number: Option<&str>,
        difficulty: Option<&str>,
    ) -> AppResult<Self> {
        let level_type = level_type
            .filter(|t| !t.is_empty() && *t != ALL_LEVEL_TYPES)
            .map(str::to_owned);

        let level_number = match level_number.map(str::trim).filter(|n| !n.is_empty()) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::validation(format!("level_number must be an integer, got {raw:?}"))
            })?),
            None => None,
        };

        let difficulty = difficulty.filter(|d| !d.is_empty()).map(str::to_owned);

        Ok(Self {
            level_type,
            level_number,
            difficulty,
        })
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(level_type) = &self.level_type {
            qb.push(" AND s.level_type = ").push_bind(level_type.clone());
        }
        if let Some(level_number) = self.level_number {
            qb.push(" AND s.level_number = ").push_bind(level_number);
        }
        if let Some(difficulty) = &self.difficulty {
            qb.push(" AND s.difficulty = ").push_bind(difficulty.clone());
        }
    }
}

/// A score annotated with its 1-based position in one query's output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedScore {
    #[serde(flatten)]
    pub score: ScoreRecord,
    pub rank: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<RankedScore>,
}

impl Leaderboard {
    /// Count of returned entries. This is post-limit: a full page does not
    /// tell the caller whether more records matched.
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }
}

/// Runs the filtered, ordered, limited scan and ranks what comes back.
pub async fn query<'e, E>(
    db: E,
    filter: &LeaderboardFilter,
    limit: i64,
) -> sqlx::Result<Leaderboard>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb = QueryBuilder::<Sqlite>::new(SCORE_VIEW_SELECT);
    filter.push_conditions(&mut qb);
    qb.push(RANKING_ORDER);
    qb.push(" LIMIT ").push_bind(limit.max(0));

    let rows = qb.build_query_as::<ScoreRecord>().fetch_all(db).await?;
    Ok(Leaderboard {
        entries: assign_ranks(rows),
    })
}

/// Numbers an already sorted, already truncated sequence from 1.
pub fn assign_ranks(sorted: Vec<ScoreRecord>) -> Vec<RankedScore> {
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, score)| RankedScore { score, rank: i + 1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{
        state::AppState,
        testing::{insert_score, insert_user},
    };

    fn ranking_cmp(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
        b.score
            .cmp(&a.score)
            .then(a.completion_time.total_cmp(&b.completion_time))
            .then(a.id.cmp(&b.id))
    }

    fn assert_ranked(entries: &[RankedScore]) {
        for (i, e) in entries.iter().enumerate() {
            assert_eq!(e.rank, i + 1);
        }
        for pair in entries.windows(2) {
            let (a, b) = (&pair[0].score, &pair[1].score);
            assert!(
                a.score > b.score || (a.score == b.score && a.completion_time <= b.completion_time),
                "out of order: {a:?} before {b:?}"
            );
        }
    }

    async fn run(st: &AppState, filter: LeaderboardFilter, limit: i64) -> Leaderboard {
        query(&st.db, &filter, limit).await.unwrap()
    }

    #[tokio::test]
    async fn equal_scores_rank_faster_time_first() {
        let st = AppState::for_tests().await;
        let u = insert_user(&st.db, "player1").await;
        insert_score(&st.db, u, "standard", Some(1), 15.5, 850, None).await;
        let slow = insert_score(&st.db, u, "standard", Some(1), 12.8, 920, None).await;
        let fast = insert_score(&st.db, u, "standard", Some(1), 10.0, 920, None).await;

        let board = run(&st, LeaderboardFilter::default(), 2).await;
        assert_eq!(board.total_count(), 2);
        assert_eq!(board.entries[0].score.id, fast);
        assert_eq!(board.entries[0].rank, 1);
        assert_eq!(board.entries[1].score.id, slow);
        assert_eq!(board.entries[1].rank, 2);
    }

    #[tokio::test]
    async fn exact_ties_fall_back_to_insertion_order() {
        let st = AppState::for_tests().await;
        let a = insert_user(&st.db, "a").await;
        let b = insert_user(&st.db, "b").await;
        let first = insert_score(&st.db, b, "custom", None, 30.0, 500, None).await;
        let second = insert_score(&st.db, a, "custom", None, 30.0, 500, None).await;

        for _ in 0..3 {
            let board = run(&st, LeaderboardFilter::default(), 50).await;
            let ids: Vec<i64> = board.entries.iter().map(|e| e.score.id).collect();
            assert_eq!(ids, vec![first, second]);
        }
    }

    #[tokio::test]
    async fn filters_compose_conjunctively() {
        let st = AppState::for_tests().await;
        let u = insert_user(&st.db, "player1").await;
        let hit = insert_score(&st.db, u, "standard", Some(2), 22.3, 780, Some("easy")).await;
        insert_score(&st.db, u, "standard", Some(2), 28.5, 680, Some("medium")).await;
        insert_score(&st.db, u, "standard", Some(1), 15.5, 850, Some("easy")).await;
        insert_score(&st.db, u, "custom", None, 30.2, 800, Some("easy")).await;

        let filter = LeaderboardFilter::parse(Some("standard"), Some("2"), Some("easy")).unwrap();
        let board = run(&st, filter, 50).await;
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].score.id, hit);

        let easy = LeaderboardFilter::parse(None, None, Some("easy")).unwrap();
        let board = run(&st, easy, 50).await;
        assert_eq!(board.total_count(), 3);
        assert!(board.entries.iter().all(|e| e.score.difficulty.as_deref() == Some("easy")));
        assert_ranked(&board.entries);
    }

    #[tokio::test]
    async fn all_means_every_level_type() {
        let st = AppState::for_tests().await;
        let u = insert_user(&st.db, "player1").await;
        insert_score(&st.db, u, "standard", Some(1), 1.0, 1, None).await;
        insert_score(&st.db, u, "challenge", None, 1.0, 2, None).await;
        insert_score(&st.db, u, "speedrun", None, 1.0, 3, None).await;

        let all = LeaderboardFilter::parse(Some("all"), None, None).unwrap();
        assert_eq!(all, LeaderboardFilter::default());
        assert_eq!(run(&st, all, 50).await.total_count(), 3);

        let custom_mode = LeaderboardFilter::parse(Some("speedrun"), None, None).unwrap();
        let board = run(&st, custom_mode, 50).await;
        assert_eq!(board.total_count(), 1);
        assert_eq!(board.entries[0].score.level_type, "speedrun");
    }

    #[tokio::test]
    async fn unmatched_filter_is_empty_not_an_error() {
        let st = AppState::for_tests().await;
        let u = insert_user(&st.db, "player1").await;
        insert_score(&st.db, u, "standard", Some(1), 1.0, 1, None).await;

        let filter = LeaderboardFilter::parse(Some("nonexistent"), None, None).unwrap();
        let board = run(&st, filter, 50).await;
        assert!(board.entries.is_empty());
        assert_eq!(board.total_count(), 0);
    }

    #[tokio::test]
    async fn total_count_reflects_the_limit() {
        let st = AppState::for_tests().await;
        let u = insert_user(&st.db, "grinder").await;
        for i in 0..8 {
            insert_score(&st.db, u, "custom", None, 10.0, i, None).await;
        }
        assert_eq!(run(&st, LeaderboardFilter::default(), 5).await.total_count(), 5);
        assert_eq!(run(&st, LeaderboardFilter::default(), 50).await.total_count(), 8);
        assert_eq!(run(&st, LeaderboardFilter::default(), 0).await.total_count(), 0);
        assert_eq!(run(&st, LeaderboardFilter::default(), -1).await.total_count(), 0);
    }

    #[tokio::test]
    async fn random_store_matches_reference_order() {
        let st = AppState::for_tests().await;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let users = [
            insert_user(&st.db, "p1").await,
            insert_user(&st.db, "p2").await,
            insert_user(&st.db, "p3").await,
        ];
        let modes = ["standard", "custom", "challenge"];
        for _ in 0..120 {
            let user = users[rng.gen_range(0..users.len())];
            let mode = modes[rng.gen_range(0..modes.len())];
            // Few distinct values so that ties on both keys actually occur.
            let score = rng.gen_range(0..6) * 100;
            let time = rng.gen_range(1..5) as f64 * 2.5;
            let level = (mode == "standard").then(|| rng.gen_range(1..4));
            insert_score(&st.db, user, mode, level, time, score, None).await;
        }

        let mut expected: Vec<ScoreRecord> = sqlx::query_as(SCORE_VIEW_SELECT)
            .fetch_all(&st.db)
            .await
            .unwrap();
        expected.retain(|s| s.level_type == "standard" && s.level_number == Some(2));
        expected.sort_by(ranking_cmp);
        expected.truncate(10);

        let filter = LeaderboardFilter::parse(Some("standard"), Some("2"), None).unwrap();
        let board = run(&st, filter, 10).await;
        assert_ranked(&board.entries);
        let got: Vec<ScoreRecord> = board.entries.into_iter().map(|e| e.score).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn parse_rejects_non_integer_level_number() {
        let err = LeaderboardFilter::parse(None, Some("two"), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn parse_treats_empty_values_as_absent() {
        let f = LeaderboardFilter::parse(Some(""), Some(""), Some("")).unwrap();
        assert_eq!(f, LeaderboardFilter::default());
    }
}
