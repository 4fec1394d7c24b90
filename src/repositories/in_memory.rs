use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::AppResult,
    models::domain::{NewQuiz, NewQuizAttempt, Quiz, QuizAttempt},
    repositories::{QuizAttemptRepository, QuizRepository},
};

/// Process-local quiz store. Ids come from an atomic counter starting at 1.
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<BTreeMap<i64, Quiz>>>,
    next_id: AtomicI64,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryQuizRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: NewQuiz) -> AppResult<Quiz> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let quiz = Quiz::from_new(id, quiz);

        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(&id).cloned())
    }

    async fn find_expired_ids(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<i64>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .values()
            .filter(|q| q.is_expired(cutoff))
            .map(|q| q.id)
            .collect())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut quizzes = self.quizzes.write().await;
        let before = quizzes.len();
        quizzes.retain(|_, q| !q.is_expired(cutoff));
        Ok((before - quizzes.len()) as u64)
    }
}

pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<BTreeMap<i64, QuizAttempt>>>,
    next_id: AtomicI64,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryQuizAttemptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: NewQuizAttempt) -> AppResult<QuizAttempt> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let attempt = QuizAttempt::from_new(id, attempt);

        let mut attempts = self.attempts.write().await;
        attempts.insert(id, attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(&id).cloned())
    }

    async fn find_by_quiz_id(&self, quiz_id: i64) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn delete_by_quiz_ids(&self, quiz_ids: &[i64]) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| !quiz_ids.contains(&a.quiz_id));
        Ok((before - attempts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::domain::UserAnswer, test_utils::fixtures::sample_question};
    use chrono::Duration;

    fn new_quiz(age_hours: i64) -> NewQuiz {
        NewQuiz::new("notes.pdf", 100, "text", vec![sample_question("q1", 0)])
            .with_created_at(Utc::now() - Duration::hours(age_hours))
    }

    fn new_attempt(quiz_id: i64) -> NewQuizAttempt {
        NewQuizAttempt {
            quiz_id,
            answers: vec![UserAnswer {
                question_id: "q1".to_string(),
                selected_answer: 0,
                is_correct: true,
            }],
            score: 100,
            completed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_assigns_incrementing_ids() {
        let repo = InMemoryQuizRepository::new();

        let first = repo.create(new_quiz(0)).await.unwrap();
        let second = repo.create(new_quiz(0)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.find_by_id(2).await.unwrap(), Some(second));
        assert_eq!(repo.find_by_id(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_older_than_removes_only_expired() {
        let repo = InMemoryQuizRepository::new();
        let old = repo.create(new_quiz(10)).await.unwrap();
        let fresh = repo.create(new_quiz(1)).await.unwrap();
        let cutoff = Utc::now() - Duration::hours(6);

        assert_eq!(repo.find_expired_ids(cutoff).await.unwrap(), vec![old.id]);
        assert_eq!(repo.delete_older_than(cutoff).await.unwrap(), 1);
        assert!(repo.find_by_id(old.id).await.unwrap().is_none());
        assert!(repo.find_by_id(fresh.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn attempts_are_grouped_and_deleted_by_quiz() {
        let repo = InMemoryQuizAttemptRepository::new();
        let a = repo.create(new_attempt(1)).await.unwrap();
        repo.create(new_attempt(1)).await.unwrap();
        let kept = repo.create(new_attempt(2)).await.unwrap();

        assert_eq!(repo.find_by_quiz_id(1).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_id(a.id).await.unwrap(), Some(a));

        assert_eq!(repo.delete_by_quiz_ids(&[1]).await.unwrap(), 2);
        assert!(repo.find_by_quiz_id(1).await.unwrap().is_empty());
        assert_eq!(repo.find_by_id(kept.id).await.unwrap(), Some(kept));
    }
}
