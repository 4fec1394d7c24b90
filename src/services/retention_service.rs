use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    errors::AppResult,
    repositories::{QuizAttemptRepository, QuizRepository},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub quizzes_removed: u64,
    pub attempts_removed: u64,
}

/// Removes quizzes older than the retention window together with their attempts.
pub struct RetentionService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
    retention: Duration,
}

impl RetentionService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
        retention: Duration,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
            retention,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.retention
    }

    /// Attempts go first so no attempt outlives its quiz if the sweep stops halfway.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<RetentionReport> {
        let cutoff = self.cutoff(now);

        let expired_ids = self.quiz_repository.find_expired_ids(cutoff).await?;
        if expired_ids.is_empty() {
            return Ok(RetentionReport::default());
        }

        let attempts_removed = self
            .attempt_repository
            .delete_by_quiz_ids(&expired_ids)
            .await?;
        let quizzes_removed = self.quiz_repository.delete_older_than(cutoff).await?;

        log::info!(
            "Retention sweep removed {} quizzes and {} attempts created before {}",
            quizzes_removed,
            attempts_removed,
            cutoff.to_rfc3339()
        );

        Ok(RetentionReport {
            quizzes_removed,
            attempts_removed,
        })
    }
}
