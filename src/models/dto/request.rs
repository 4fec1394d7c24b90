use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};

pub const MAX_QUESTION_COUNT: u32 = 100;

/// Body of `POST /api/generate-quiz`. Every field is optional at the wire level so a
/// missing field yields one readable message instead of a serde parse error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub content: Option<String>,

    #[validate(length(max = 255, message = "File name is too long"))]
    pub file_name: Option<String>,

    #[validate(range(min = 1, message = "File size must be positive"))]
    pub file_size: Option<i64>,

    #[validate(range(min = 1, max = MAX_QUESTION_COUNT, message = "Question count must be between 1 and 100"))]
    pub question_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateQuizCommand {
    pub content: String,
    pub file_name: String,
    pub file_size: i64,
    pub question_count: usize,
}

impl GenerateQuizRequest {
    /// Empty strings and zero counts are reported as missing before range checks run.
    pub fn into_command(self) -> AppResult<GenerateQuizCommand> {
        let (Some(content), Some(file_name), Some(file_size), Some(question_count)) = (
            self.content.as_deref().filter(|c| !c.is_empty()),
            self.file_name.as_deref().filter(|n| !n.is_empty()),
            self.file_size.filter(|s| *s != 0),
            self.question_count.filter(|c| *c != 0),
        ) else {
            return Err(AppError::ValidationError(
                "Missing required fields: content, fileName, fileSize, questionCount".to_string(),
            ));
        };

        self.validate()?;

        Ok(GenerateQuizCommand {
            content: content.to_string(),
            file_name: file_name.to_string(),
            file_size,
            question_count: question_count as usize,
        })
    }
}

/// Body of `POST /api/quiz/{id}/submit`. `answers` stays untyped until the handler
/// confirms it is an array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    pub selected_answer: i64,
}

impl SubmitQuizRequest {
    pub fn parse_answers(self) -> AppResult<Vec<AnswerInput>> {
        if !self.answers.is_array() {
            return Err(AppError::ValidationError(
                "Answers must be an array".to_string(),
            ));
        }

        serde_json::from_value(self.answers).map_err(|e| {
            AppError::ValidationError(format!(
                "Each answer needs a questionId and a numeric selectedAnswer: {}",
                e
            ))
        })
    }
}
