#[cfg(test)]
mod tests {
    use crate::handler::*;
    use common::models::{Evaluation, RubricScoreSet, UserProgress};
    use common::{Catalog, Config, Error, Result};
    use db::{MemoryStore, ProgressionStore};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    const CATALOG: &str = r#"{
        "rubric": {"min_score": 1, "criteria": [
            {"name": "A", "max_score": 5},
            {"name": "B", "max_score": 5}
        ]},
        "samples": [
            {"id": "s1", "prompt": "p1", "code": "c1", "reference": {
                "A": {"score": 5, "feedback": "clean"},
                "B": {"score": 5, "feedback": "documented"}
            }},
            {"id": "s2", "prompt": "p2", "code": "c2", "reference": {
                "A": {"score": 3}, "B": {"score": 3}
            }}
        ],
        "badges": [
            {"id": "first", "name": "First", "description": "", "icon": "", "category": "reviewCount", "requirement": 1},
            {"id": "p200", "name": "P200", "description": "", "icon": "", "category": "points", "requirement": 200},
            {"id": "perfect", "name": "Perfect", "description": "", "icon": "", "category": "accuracy", "requirement": 100},
            {"id": "top1", "name": "Top", "description": "", "icon": "", "category": "ranking", "requirement": 1},
            {"id": "words5", "name": "Words", "description": "", "icon": "", "category": "wordCount", "requirement": 5}
        ]
    }"#;

    /// Memory store whose next append fails, as if the connection dropped mid-write
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_next_append: AtomicBool,
    }

    impl ProgressionStore for FlakyStore {
        async fn create(&self, user_id: &str) -> Result<UserProgress> {
            self.inner.create(user_id).await
        }

        async fn load(&self, user_id: &str) -> Result<Option<UserProgress>> {
            self.inner.load(user_id).await
        }

        async fn append_evaluation(
            &self,
            user_id: &str,
            evaluation: Evaluation,
            badge_ids: &BTreeSet<String>,
        ) -> Result<UserProgress> {
            if self.fail_next_append.swap(false, Ordering::SeqCst) {
                return Err(Error::Database("connection reset".to_string()));
            }
            self.inner.append_evaluation(user_id, evaluation, badge_ids).await
        }

        async fn add_badges(&self, user_id: &str, badge_ids: &BTreeSet<String>) -> Result<()> {
            self.inner.add_badges(user_id, badge_ids).await
        }

        async fn points_snapshot(&self) -> Result<Vec<(String, i64)>> {
            self.inner.points_snapshot().await
        }
    }

    fn make_handler_with<S: ProgressionStore>(store: S, min_population: usize) -> SubmissionHandler<S> {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let config = Config {
            ranking_min_population: min_population,
            ..Config::default()
        };
        SubmissionHandler::new(store, catalog, &config)
    }

    fn make_handler(min_population: usize) -> SubmissionHandler<MemoryStore> {
        make_handler_with(MemoryStore::new(), min_population)
    }

    fn submission(user_id: &str, sample_id: &str, a: f64, b: f64) -> Submission {
        Submission {
            user_id: user_id.to_string(),
            sample_id: sample_id.to_string(),
            scores: [("A", a), ("B", b)].into_iter().collect(),
            feedback: vec![String::new(), String::new()],
        }
    }

    fn badge_ids(outcome: &SubmissionOutcome) -> Vec<&str> {
        outcome.new_badges.iter().map(|b| b.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_login_creates_then_loads() {
        let handler = make_handler(10);
        let created = handler.login("  alice ").await.unwrap();
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.cumulative_points, 0);

        let loaded = handler.login("alice").await.unwrap();
        assert_eq!(loaded.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_user() {
        let handler = make_handler(10);
        assert!(matches!(handler.login("   ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_perfect_submission() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();

        let outcome = handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();
        assert_eq!(outcome.accuracy, 100);
        assert_eq!(outcome.points_awarded, 150);
        assert_eq!(outcome.cumulative_points, 150);
        assert_eq!(outcome.rank, Some(1));
        assert_eq!(outcome.evaluation.total_score, 10.0);
        assert_eq!(outcome.reference_feedback["A"], "clean");
        // Ranking badge stays locked with a single trainee
        assert_eq!(badge_ids(&outcome), vec!["first", "perfect"]);

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        assert!(progress.earned_badge_ids.contains("first"));
        assert!(progress.earned_badge_ids.contains("perfect"));
    }

    #[tokio::test]
    async fn test_points_accumulate_and_badges_unlock_once() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();

        handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();
        let outcome = handler.submit(submission("alice", "s2", 3.0, 3.0)).await.unwrap();

        assert_eq!(outcome.cumulative_points, 300);
        assert_eq!(badge_ids(&outcome), vec!["p200"]);
    }

    #[tokio::test]
    async fn test_duplicate_submission_awards_nothing() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();
        handler.submit(submission("alice", "s1", 1.0, 1.0)).await.unwrap();

        let err = handler
            .submit(submission("alice", "s1", 5.0, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSubmission { .. }));

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        assert_eq!(progress.cumulative_points, 50);
        assert_eq!(progress.evaluation_history.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_sample_is_not_scored() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();

        let err = handler
            .submit(submission("alice", "missing", 3.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSample(_)));

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        assert_eq!(progress.cumulative_points, 0);
        assert!(progress.evaluation_history.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_scores_rejected_before_scoring() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();

        let err = handler
            .submit(submission("alice", "s1", 6.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidScoreRange { .. }));

        let partial = Submission {
            scores: [("A", 3.0)].into_iter().collect::<RubricScoreSet>(),
            ..submission("alice", "s1", 0.0, 0.0)
        };
        let err = handler.submit(partial).await.unwrap_err();
        assert!(matches!(err, Error::IncompleteSubmission { .. }));

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        assert_eq!(progress.cumulative_points, 0);
    }

    #[tokio::test]
    async fn test_submit_requires_login() {
        let handler = make_handler(10);
        let err = handler
            .submit(submission("ghost", "s1", 3.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_word_count_badge_reads_combined_feedback() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();

        let mut sub = submission("alice", "s2", 1.0, 1.0);
        sub.feedback = vec!["needs docstrings".to_string(), "no error handling".to_string()];
        let outcome = handler.submit(sub).await.unwrap();
        assert!(badge_ids(&outcome).contains(&"words5"));
    }

    #[tokio::test]
    async fn test_ranking_badge_with_enough_trainees() {
        let handler = make_handler(3);
        for user in ["bob", "carol"] {
            handler.login(user).await.unwrap();
            handler.submit(submission(user, "s2", 1.0, 1.0)).await.unwrap();
        }
        handler.login("alice").await.unwrap();

        let outcome = handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();
        assert_eq!(outcome.rank, Some(1));
        assert!(badge_ids(&outcome).contains(&"top1"));
    }

    #[tokio::test]
    async fn test_leaderboard_and_profile() {
        let handler = make_handler(10);
        for user in ["bob", "alice"] {
            handler.login(user).await.unwrap();
        }
        handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();

        let board = handler.leaderboard(10).await.unwrap();
        let order: Vec<_> = board.iter().map(|r| r.entry.user_id.as_str()).collect();
        assert_eq!(order, vec!["alice", "bob"]);

        let profile = handler.profile("bob").await.unwrap();
        assert_eq!(profile.rank, Some(2));
        assert_eq!(profile.summary.total_reviews, 0);

        let profile = handler.profile("alice").await.unwrap();
        assert_eq!(profile.summary.best_accuracy, 100);
        // 150 of a possible (50 + 100) * 2
        assert!((profile.summary.progress_percent - 50.0).abs() < 1e-9);
        assert_eq!(profile.badges.len(), 2);
    }

    #[tokio::test]
    async fn test_export_includes_history() {
        let handler = make_handler(10);
        handler.login("alice").await.unwrap();
        handler.submit(submission("alice", "s1", 4.0, 4.0)).await.unwrap();

        let export = handler.export("alice").await.unwrap();
        assert_eq!(export.accuracy_history.len(), 1);
        assert_eq!(export.accuracy_history[0].accuracy, 75);
        assert_eq!(export.profile.progress.cumulative_points, 125);

        assert!(matches!(handler.export("ghost").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leaderboard_rows_carry_badges_and_review_counts() {
        let handler = make_handler(10);
        for user in ["bob", "alice"] {
            handler.login(user).await.unwrap();
        }
        handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();
        handler.submit(submission("alice", "s2", 3.0, 3.0)).await.unwrap();

        let board = handler.leaderboard(10).await.unwrap();
        assert_eq!(board[0].entry.rank, 1);
        assert_eq!(board[0].entry.points, 300);
        assert_eq!(board[0].total_reviews, 2);
        let badges: Vec<_> = board[0].badges.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(badges, vec!["first", "p200", "perfect"]);

        assert_eq!(board[1].entry.user_id, "bob");
        assert_eq!(board[1].total_reviews, 0);
        assert!(board[1].badges.is_empty());

        assert_eq!(handler.leaderboard(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_trace_and_retry_awards_badges() {
        let store = FlakyStore::default();
        store.fail_next_append.store(true, Ordering::SeqCst);
        let handler = make_handler_with(store, 10);
        handler.login("alice").await.unwrap();

        let err = handler
            .submit(submission("alice", "s1", 5.0, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        assert_eq!(progress.cumulative_points, 0);
        assert!(progress.evaluation_history.is_empty());
        assert!(progress.earned_badge_ids.is_empty());

        let outcome = handler.submit(submission("alice", "s1", 5.0, 5.0)).await.unwrap();
        assert_eq!(outcome.cumulative_points, 150);
        assert_eq!(badge_ids(&outcome), vec!["first", "perfect"]);

        let progress = handler.store().load("alice").await.unwrap().unwrap();
        let earned: Vec<_> = progress.earned_badge_ids.iter().map(String::as_str).collect();
        assert_eq!(earned, vec!["first", "perfect"]);
    }
}
