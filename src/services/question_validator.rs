use serde_json::{Map, Value};

use crate::models::domain::{quiz_question::OPTION_COUNT, QuizQuestion};

/// Keeps candidates that satisfy the question shape, in their original order, up to
/// `max_questions`. Anything malformed is dropped silently.
pub fn validate(candidates: &[Value], max_questions: usize) -> Vec<QuizQuestion> {
    candidates
        .iter()
        .filter_map(to_question)
        .take(max_questions)
        .collect()
}

fn to_question(candidate: &Value) -> Option<QuizQuestion> {
    let object = candidate.as_object()?;

    let prompt = non_empty_string(object, "question")?;
    let explanation = object.get("explanation")?.as_str()?.to_string();
    let options = options(object.get("options")?)?;
    let correct_option_index = option_index(object.get("correctAnswer")?)?;
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(QuizQuestion {
        id,
        prompt,
        options,
        correct_option_index,
        explanation,
    })
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn options(value: &Value) -> Option<[String; OPTION_COUNT]> {
    let items = value.as_array()?;
    if items.len() != OPTION_COUNT {
        return None;
    }

    let texts: Vec<String> = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<_>>()?;

    texts.try_into().ok()
}

/// Accepts integral JSON numbers in `0..OPTION_COUNT`, including forms like `2.0`.
fn option_index(value: &Value) -> Option<usize> {
    let index = match value.as_u64() {
        Some(index) => index,
        None => {
            let float = value.as_f64()?;
            if float.fract() != 0.0 || float < 0.0 {
                return None;
            }
            float as u64
        }
    };

    usize::try_from(index).ok().filter(|i| *i < OPTION_COUNT)
}
