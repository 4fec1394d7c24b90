use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{NewQuizAttempt, QuizAttempt},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: NewQuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizAttempt>>;
    async fn find_by_quiz_id(&self, quiz_id: i64) -> AppResult<Vec<QuizAttempt>>;
    async fn delete_by_quiz_ids(&self, quiz_ids: &[i64]) -> AppResult<u64>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizAttemptRecord {
    attempt_id: i64,
    quiz_id: i64,
    attempt: QuizAttempt,
}

pub struct MongoQuizAttemptRepository {
    db: Database,
    collection: Collection<QuizAttemptRecord>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self {
            db: db.clone(),
            collection,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: NewQuizAttempt) -> AppResult<QuizAttempt> {
        let id = self.db.next_sequence("quiz_attempts").await?;
        let attempt = QuizAttempt::from_new(id, attempt);

        let record = QuizAttemptRecord {
            attempt_id: id,
            quiz_id: attempt.quiz_id,
            attempt,
        };
        self.collection.insert_one(&record).await?;

        Ok(record.attempt)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizAttempt>> {
        let record = self.collection.find_one(doc! { "attempt_id": id }).await?;
        Ok(record.map(|r| r.attempt))
    }

    async fn find_by_quiz_id(&self, quiz_id: i64) -> AppResult<Vec<QuizAttempt>> {
        let records: Vec<QuizAttemptRecord> = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "attempt_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(records.into_iter().map(|r| r.attempt).collect())
    }

    async fn delete_by_quiz_ids(&self, quiz_ids: &[i64]) -> AppResult<u64> {
        if quiz_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "quiz_id": { "$in": quiz_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
