#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{NewQuiz, Quiz, QuizQuestion};

    /// Creates a well-formed question with the given id and correct option
    pub fn sample_question(id: &str, correct_option_index: usize) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            prompt: format!("Question {}?", id),
            options: [
                "Alpha".to_string(),
                "Beta".to_string(),
                "Gamma".to_string(),
                "Delta".to_string(),
            ],
            correct_option_index,
            explanation: format!("Explanation for {}", id),
        }
    }

    /// Creates a stored quiz holding the given questions
    pub fn sample_quiz(id: i64, questions: Vec<QuizQuestion>) -> Quiz {
        Quiz::from_new(id, NewQuiz::new("notes.pdf", 4096, "source text", questions))
    }

    /// Raw model reply carrying `count` valid question objects
    pub fn model_reply(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"id":"q{}","question":"What is item {}?","options":["a","b","c","d"],"correctAnswer":{},"explanation":"Because {}."}}"#,
                    i + 1,
                    i,
                    i % 4,
                    i
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_question() {
        let question = sample_question("q9", 2);
        assert_eq!(question.id, "q9");
        assert_eq!(question.correct_option(), "Gamma");
    }

    #[test]
    fn test_fixtures_model_reply_is_json_array() {
        let reply = model_reply(3);
        let parsed: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_fixtures_sample_quiz() {
        let quiz = sample_quiz(4, vec![sample_question("q1", 0)]);
        assert_eq!(quiz.id, 4);
        assert_eq!(quiz.question_count, 1);
    }
}
