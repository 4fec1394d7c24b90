use serde::Serialize;

use crate::models::domain::{QuizAttempt, QuizQuestion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorrectAnswer {
    pub question: QuizQuestion,
    pub user_answer: i64,
    pub correct_answer: usize,
}

/// The stored attempt plus grading feedback for the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub correct_count: usize,
    pub total_questions: usize,
    pub incorrect_answers: Vec<IncorrectAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    pub content: String,
    pub page_count: usize,
    pub file_name: String,
    pub file_size: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{NewQuizAttempt, QuizAttempt};
    use chrono::Utc;

    #[test]
    fn submit_response_flattens_attempt_fields() {
        let response = SubmitQuizResponse {
            attempt: QuizAttempt::from_new(
                1,
                NewQuizAttempt {
                    quiz_id: 2,
                    answers: vec![],
                    score: 50,
                    completed_at: Utc::now(),
                },
            ),
            correct_count: 1,
            total_questions: 2,
            incorrect_answers: vec![],
        };

        let json = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(json["id"], 1);
        assert_eq!(json["quizId"], 2);
        assert_eq!(json["score"], 50);
        assert_eq!(json["correctCount"], 1);
        assert_eq!(json["totalQuestions"], 2);
        assert!(json["incorrectAnswers"].as_array().is_some());
    }
}
