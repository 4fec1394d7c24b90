use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: i64,
    pub answers: Vec<UserAnswer>,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_answer: i64,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuizAttempt {
    pub quiz_id: i64,
    pub answers: Vec<UserAnswer>,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn from_new(id: i64, attempt: NewQuizAttempt) -> Self {
        QuizAttempt {
            id,
            quiz_id: attempt.quiz_id,
            answers: attempt.answers,
            score: attempt.score,
            completed_at: attempt.completed_at,
        }
    }
}
