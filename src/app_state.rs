use std::sync::Arc;

use chrono::Duration;

use crate::{
    config::{Config, StorageBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        InMemoryQuizAttemptRepository, InMemoryQuizRepository, MongoQuizAttemptRepository,
        MongoQuizRepository, QuizAttemptRepository, QuizRepository,
    },
    services::{
        document_service::{DocumentService, LopdfExtractor, TextExtractor},
        model_service::{OpenAiQuizModel, QuizModel},
        quiz_attempt_service::QuizAttemptService,
        quiz_generator::{GenerationSettings, QuizGenerator},
        quiz_service::QuizService,
        retention_service::RetentionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub document_service: Arc<DocumentService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let (quiz_repository, attempt_repository): (
            Arc<dyn QuizRepository>,
            Arc<dyn QuizAttemptRepository>,
        ) = match config.storage_backend {
            StorageBackend::Mongo => {
                let db = Database::connect(&config).await?;

                let quiz_repository = MongoQuizRepository::new(&db);
                quiz_repository.ensure_indexes().await?;
                let attempt_repository = MongoQuizAttemptRepository::new(&db);
                attempt_repository.ensure_indexes().await?;

                (Arc::new(quiz_repository), Arc::new(attempt_repository))
            }
            StorageBackend::Memory => {
                log::info!("Using in-memory storage; data is lost on restart");
                (
                    Arc::new(InMemoryQuizRepository::new()),
                    Arc::new(InMemoryQuizAttemptRepository::new()),
                )
            }
        };

        let model: Option<Arc<dyn QuizModel>> = match &config.llm_api_key {
            Some(api_key) => Some(Arc::new(OpenAiQuizModel::new(
                &config.llm_api_base,
                api_key,
                config.llm_model.clone(),
            ))),
            None => {
                log::warn!("LLM_API_KEY is not set; quiz generation is disabled");
                None
            }
        };

        Ok(Self::with_parts(
            config,
            quiz_repository,
            attempt_repository,
            model,
            Arc::new(LopdfExtractor),
        ))
    }

    /// Wires services over the given collaborators.
    pub fn with_parts(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
        model: Option<Arc<dyn QuizModel>>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let retention = Arc::new(RetentionService::new(
            quiz_repository.clone(),
            attempt_repository.clone(),
            Duration::hours(config.retention_hours),
        ));

        let generator =
            model.map(|model| QuizGenerator::new(model, GenerationSettings::from(&config)));

        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            generator,
            retention,
        ));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
        ));
        let document_service = Arc::new(DocumentService::new(
            extractor,
            config.min_document_chars,
        ));

        Self {
            quiz_service,
            quiz_attempt_service,
            document_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn memory_backend_builds_without_external_services() {
        let mut config = Config::test_config();
        config.llm_api_key = None;

        let state = AppState::new(config).await.unwrap();

        assert!(state.quiz_service.get_quiz(1).await.is_err());
    }
}
