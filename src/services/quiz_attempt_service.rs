use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewQuizAttempt, Quiz, UserAnswer},
        dto::{
            request::AnswerInput,
            response::{IncorrectAnswer, SubmitQuizResponse},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
};

/// Outcome of grading one submission against a quiz's answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAttempt {
    pub answers: Vec<UserAnswer>,
    pub correct_count: usize,
    pub total_questions: usize,
    pub score: u8,
    pub incorrect_answers: Vec<IncorrectAnswer>,
}

pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    /// Grades the submission, stores the attempt and returns it with feedback.
    pub async fn submit_attempt(
        &self,
        quiz_id: i64,
        submitted_answers: &[AnswerInput],
    ) -> AppResult<SubmitQuizResponse> {
        let quiz = self
            .quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let graded = Self::grade_attempt(&quiz, submitted_answers);

        let attempt = self
            .attempt_repository
            .create(NewQuizAttempt {
                quiz_id,
                answers: graded.answers,
                score: graded.score,
                completed_at: Utc::now(),
            })
            .await?;

        log::info!(
            "Recorded attempt {} for quiz {}: {}/{} correct",
            attempt.id,
            quiz_id,
            graded.correct_count,
            graded.total_questions
        );

        Ok(SubmitQuizResponse {
            attempt,
            correct_count: graded.correct_count,
            total_questions: graded.total_questions,
            incorrect_answers: graded.incorrect_answers,
        })
    }

    /// Pure grading; the same quiz and answers always produce the same result.
    ///
    /// Answers naming an unknown question are recorded as incorrect but excluded from
    /// the tallies. Only the first answer per question counts. Unanswered questions still
    /// count toward `total_questions`.
    pub fn grade_attempt(quiz: &Quiz, submitted_answers: &[AnswerInput]) -> GradedAttempt {
        let answers: Vec<UserAnswer> = submitted_answers
            .iter()
            .map(|submitted| {
                let is_correct = quiz
                    .find_question(&submitted.question_id)
                    .is_some_and(|q| {
                        usize::try_from(submitted.selected_answer)
                            .is_ok_and(|selected| selected == q.correct_option_index)
                    });

                UserAnswer {
                    question_id: submitted.question_id.clone(),
                    selected_answer: submitted.selected_answer,
                    is_correct,
                }
            })
            .collect();

        let mut first_answers: HashMap<&str, &UserAnswer> = HashMap::new();
        for answer in &answers {
            first_answers
                .entry(answer.question_id.as_str())
                .or_insert(answer);
        }

        let correct_count = quiz
            .questions
            .iter()
            .filter(|q| first_answers.get(q.id.as_str()).is_some_and(|a| a.is_correct))
            .count();

        let incorrect_answers = quiz
            .questions
            .iter()
            .filter_map(|q| {
                let answer = first_answers.get(q.id.as_str())?;
                (!answer.is_correct).then(|| IncorrectAnswer {
                    question: q.clone(),
                    user_answer: answer.selected_answer,
                    correct_answer: q.correct_option_index,
                })
            })
            .collect();

        let total_questions = quiz.questions.len();

        GradedAttempt {
            correct_count,
            total_questions,
            score: percentage(correct_count, total_questions),
            incorrect_answers,
            answers,
        }
    }
}

fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u8
}
