use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewQuiz, Quiz},
        dto::request::GenerateQuizCommand,
    },
    repositories::QuizRepository,
    services::{quiz_generator::QuizGenerator, retention_service::RetentionService},
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    generator: Option<QuizGenerator>,
    retention: Arc<RetentionService>,
}

impl QuizService {
    /// `generator` is `None` when no model API key is configured.
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        generator: Option<QuizGenerator>,
        retention: Arc<RetentionService>,
    ) -> Self {
        Self {
            repository,
            generator,
            retention,
        }
    }

    pub async fn get_quiz(&self, id: i64) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        Ok(quiz)
    }

    pub async fn generate_quiz(&self, command: GenerateQuizCommand) -> AppResult<Quiz> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| AppError::InternalError("API key not configured".to_string()))?;

        log::info!(
            "Generating {} questions for '{}' ({} chars)",
            command.question_count,
            command.file_name,
            command.content.chars().count()
        );

        let questions = generator
            .generate(&command.content, command.question_count)
            .await?;

        let quiz = self
            .repository
            .create(NewQuiz::new(
                command.file_name,
                command.file_size,
                command.content,
                questions,
            ))
            .await?;

        log::info!(
            "Stored quiz {} with {} questions",
            quiz.id,
            quiz.question_count
        );

        if let Err(e) = self.retention.sweep(Utc::now()).await {
            log::warn!("Retention sweep failed after creating quiz {}: {}", quiz.id, e);
        }

        Ok(quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::{
            quiz_attempt_repository::MockQuizAttemptRepository, InMemoryQuizAttemptRepository,
            InMemoryQuizRepository,
        },
        services::{
            model_service::MockQuizModel, quiz_generator::GenerationSettings,
        },
        test_utils::fixtures::model_reply,
    };
    use chrono::Duration;

    fn command(question_count: usize) -> GenerateQuizCommand {
        GenerateQuizCommand {
            content: "Photosynthesis turns light into chemical energy. ".repeat(10),
            file_name: "biology.pdf".to_string(),
            file_size: 2048,
            question_count,
        }
    }

    fn generator_replying(count: usize) -> QuizGenerator {
        let mut model = MockQuizModel::new();
        model
            .expect_complete()
            .returning(move |_| Ok(Some(model_reply(count))));
        QuizGenerator::new(Arc::new(model), GenerationSettings::default())
    }

    fn retention(quizzes: Arc<InMemoryQuizRepository>) -> Arc<RetentionService> {
        Arc::new(RetentionService::new(
            quizzes,
            Arc::new(InMemoryQuizAttemptRepository::new()),
            Duration::hours(6),
        ))
    }

    #[tokio::test]
    async fn generate_quiz_stores_questions_and_content() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let service = QuizService::new(
            quizzes.clone(),
            Some(generator_replying(3)),
            retention(quizzes.clone()),
        );

        let quiz = service.generate_quiz(command(3)).await.unwrap();

        assert_eq!(quiz.question_count, 3);
        assert_eq!(quiz.file_name, "biology.pdf");
        assert_eq!(quiz.content, command(3).content);
        assert_eq!(service.get_quiz(quiz.id).await.unwrap(), quiz);
    }

    #[tokio::test]
    async fn generate_quiz_without_model_is_internal_error() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let service = QuizService::new(quizzes.clone(), None, retention(quizzes));

        let err = service.generate_quiz(command(3)).await.unwrap_err();

        assert!(matches!(err, AppError::InternalError(msg) if msg == "API key not configured"));
    }

    #[tokio::test]
    async fn generate_quiz_sweeps_expired_quizzes() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let stale = quizzes
            .create(
                NewQuiz::new("old.pdf", 1, "old", vec![])
                    .with_created_at(Utc::now() - Duration::hours(8)),
            )
            .await
            .unwrap();
        let service = QuizService::new(
            quizzes.clone(),
            Some(generator_replying(2)),
            retention(quizzes.clone()),
        );

        service.generate_quiz(command(2)).await.unwrap();

        assert!(quizzes.find_by_id(stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_sweep_does_not_fail_generation() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        quizzes
            .create(
                NewQuiz::new("old.pdf", 1, "old", vec![])
                    .with_created_at(Utc::now() - Duration::hours(8)),
            )
            .await
            .unwrap();
        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_delete_by_quiz_ids()
            .returning(|_| Err(AppError::DatabaseError("offline".to_string())));
        let retention = Arc::new(RetentionService::new(
            quizzes.clone(),
            Arc::new(attempts),
            Duration::hours(6),
        ));
        let service = QuizService::new(quizzes, Some(generator_replying(2)), retention);

        let quiz = service.generate_quiz(command(2)).await.unwrap();

        assert_eq!(quiz.question_count, 2);
    }

    #[tokio::test]
    async fn get_quiz_missing_is_not_found() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let service = QuizService::new(quizzes.clone(), None, retention(quizzes));

        let err = service.get_quiz(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
