use serde::{Deserialize, Serialize};

pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question. `correct_option_index` always points into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswer")]
    pub correct_option_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }
}
