use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub file_name: String,
    pub file_size: i64,
    pub content: String,
    pub question_count: usize,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

/// A quiz that has not been stored yet; the repository assigns its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuiz {
    pub file_name: String,
    pub file_size: i64,
    pub content: String,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

impl NewQuiz {
    pub fn new(
        file_name: impl Into<String>,
        file_size: i64,
        content: impl Into<String>,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_size,
            content: content.into(),
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

impl Quiz {
    pub fn from_new(id: i64, quiz: NewQuiz) -> Self {
        Quiz {
            id,
            file_name: quiz.file_name,
            file_size: quiz.file_size,
            content: quiz.content,
            question_count: quiz.questions.len(),
            questions: quiz.questions,
            created_at: quiz.created_at,
        }
    }

    pub fn find_question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}
