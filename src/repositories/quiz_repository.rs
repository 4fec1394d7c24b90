use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{NewQuiz, Quiz},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Stores the quiz under a freshly allocated id.
    async fn create(&self, quiz: NewQuiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>>;
    /// Ids of quizzes created strictly before `cutoff`.
    async fn find_expired_ids(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<i64>>;
    /// Removes quizzes created strictly before `cutoff`, returning how many went.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Stored shape: the quiz plus flat fields the queries filter on.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizRecord {
    quiz_id: i64,
    created_at_ms: i64,
    quiz: Quiz,
}

pub struct MongoQuizRepository {
    db: Database,
    collection: Collection<QuizRecord>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self {
            db: db.clone(),
            collection,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_id_unique".to_string())
                    .build(),
            )
            .build();

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at_ms": 1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_ms".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(created_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: NewQuiz) -> AppResult<Quiz> {
        let id = self.db.next_sequence("quizzes").await?;
        let quiz = Quiz::from_new(id, quiz);

        let record = QuizRecord {
            quiz_id: id,
            created_at_ms: quiz.created_at.timestamp_millis(),
            quiz,
        };
        self.collection.insert_one(&record).await?;

        Ok(record.quiz)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let record = self.collection.find_one(doc! { "quiz_id": id }).await?;
        Ok(record.map(|r| r.quiz))
    }

    async fn find_expired_ids(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<i64>> {
        let records: Vec<QuizRecord> = self
            .collection
            .find(doc! { "created_at_ms": { "$lt": cutoff.timestamp_millis() } })
            .await?
            .try_collect()
            .await?;

        Ok(records.into_iter().map(|r| r.quiz_id).collect())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "created_at_ms": { "$lt": cutoff.timestamp_millis() } })
            .await?;
        Ok(result.deleted_count)
    }
}
