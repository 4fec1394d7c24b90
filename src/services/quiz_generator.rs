use std::sync::Arc;

use chrono::Utc;

use crate::{
    config::Config,
    constants::prompts::{quiz_chunk_prompt, quiz_fallback_prompt, quiz_generator_prompt},
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
    services::{
        chunker::{truncate_chars, Chunker},
        model_service::{CompletionRequest, QuizModel},
        question_validator::validate,
        response_repair::{parse_question_array, RepairError},
    },
};

const PRIMARY_MAX_TOKENS: u32 = 4000;
const PRIMARY_TEMPERATURE: f32 = 0.7;
const FALLBACK_MAX_TOKENS: u32 = 2000;
const FALLBACK_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub max_content_length: usize,
    pub max_chunk_size: usize,
    pub fallback_excerpt_chars: usize,
    pub fallback_max_questions: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_content_length: 500_000,
            max_chunk_size: 12_000,
            fallback_excerpt_chars: 3_000,
            fallback_max_questions: 3,
        }
    }
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_content_length: config.max_content_length,
            max_chunk_size: config.max_chunk_size,
            ..Self::default()
        }
    }
}

/// Result of one request for one chunk.
#[derive(Debug)]
enum ChunkOutcome {
    Questions(Vec<QuizQuestion>),
    /// Transport failure or empty reply; the chunk contributes nothing.
    Unavailable,
    Malformed(RepairError),
}

/// Drives chunk-by-chunk question generation against a `QuizModel`.
///
/// Chunks are processed strictly in order: each chunk's request size depends on how
/// many questions earlier chunks already produced.
pub struct QuizGenerator {
    model: Arc<dyn QuizModel>,
    settings: GenerationSettings,
}

impl QuizGenerator {
    pub fn new(model: Arc<dyn QuizModel>, settings: GenerationSettings) -> Self {
        Self { model, settings }
    }

    pub async fn generate(&self, content: &str, desired_count: usize) -> AppResult<Vec<QuizQuestion>> {
        let content = self.bounded_content(content);
        let chunks = Chunker::new(self.settings.max_chunk_size).split(content);
        let per_chunk_target = desired_count.div_ceil(chunks.len().max(1));

        log::info!(
            "Generating {} questions from {} chunk(s), {} per chunk",
            desired_count,
            chunks.len(),
            per_chunk_target
        );

        let mut questions: Vec<QuizQuestion> = Vec::with_capacity(desired_count);

        for (index, chunk) in chunks.iter().enumerate() {
            let remaining = desired_count.saturating_sub(questions.len());
            if remaining == 0 {
                log::debug!("Desired count reached, skipping chunks from {}", index);
                break;
            }
            let requested = per_chunk_target.min(remaining);

            let produced = match self.attempt(index, chunk, requested).await {
                ChunkOutcome::Questions(found) => found,
                ChunkOutcome::Unavailable => Vec::new(),
                ChunkOutcome::Malformed(err) => {
                    log::warn!("Failed to parse questions for chunk {}: {}", index, err);
                    match self.fallback_attempt(index, chunk, requested).await {
                        ChunkOutcome::Questions(found) => found,
                        ChunkOutcome::Unavailable => Vec::new(),
                        ChunkOutcome::Malformed(err) => {
                            log::error!("Retry also failed for chunk {}: {}", index, err);
                            Vec::new()
                        }
                    }
                }
            };

            log::info!("Parsed {} questions from chunk {}", produced.len(), index);
            questions.extend(produced);
        }

        if questions.is_empty() {
            return Err(AppError::GenerationFailed(
                "Failed to generate any questions from the content".to_string(),
            ));
        }

        Ok(reassign_ids(questions))
    }

    fn bounded_content<'a>(&self, content: &'a str) -> &'a str {
        let bounded = truncate_chars(content, self.settings.max_content_length);
        if bounded.len() < content.len() {
            log::warn!(
                "Content truncated from {} to {} characters for processing",
                content.chars().count(),
                self.settings.max_content_length
            );
        }
        bounded
    }

    async fn attempt(&self, index: usize, chunk: &str, requested: usize) -> ChunkOutcome {
        let request = CompletionRequest::new(quiz_chunk_prompt(requested, chunk))
            .with_system(quiz_generator_prompt(requested))
            .with_max_tokens(PRIMARY_MAX_TOKENS)
            .with_temperature(PRIMARY_TEMPERATURE);

        self.request_questions(index, request, requested).await
    }

    /// Smaller request over the start of the chunk, used once after a malformed reply.
    async fn fallback_attempt(&self, index: usize, chunk: &str, requested: usize) -> ChunkOutcome {
        let limit = requested.min(self.settings.fallback_max_questions);
        let excerpt = truncate_chars(chunk, self.settings.fallback_excerpt_chars);
        log::info!("Retrying chunk {} with simpler prompt for {} questions", index, limit);

        let request = CompletionRequest::new(quiz_fallback_prompt(limit, excerpt))
            .with_max_tokens(FALLBACK_MAX_TOKENS)
            .with_temperature(FALLBACK_TEMPERATURE);

        self.request_questions(index, request, limit).await
    }

    async fn request_questions(
        &self,
        index: usize,
        request: CompletionRequest,
        limit: usize,
    ) -> ChunkOutcome {
        let reply = match self.model.complete(request).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                log::warn!("Model returned no content for chunk {}", index);
                return ChunkOutcome::Unavailable;
            }
            Err(err) => {
                log::error!("Model request failed for chunk {}: {}", index, err);
                return ChunkOutcome::Unavailable;
            }
        };

        match parse_question_array(&reply) {
            Ok(candidates) => ChunkOutcome::Questions(validate(&candidates, limit)),
            Err(err) => {
                log::debug!(
                    "Problematic content for chunk {}: {}",
                    index,
                    reply.chars().take(200).collect::<String>()
                );
                ChunkOutcome::Malformed(err)
            }
        }
    }
}

/// Model-supplied ids are untrusted and collide across chunks.
fn reassign_ids(questions: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
    let stamp = Utc::now().timestamp_millis();
    questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| QuizQuestion {
            id: format!("q_{}_{}", stamp, index),
            ..question
        })
        .collect()
}
