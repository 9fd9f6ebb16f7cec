//! Response Validator: the only gate between raw completion text and a trusted
//! question list.
//!
//! The completion provider gives no schema guarantee, so the text is walked as
//! an untyped `serde_json::Value` and every contract rule is checked
//! explicitly. Validation is fail-fast: the first offending question aborts the
//! walk and nothing partial is returned.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::question::{AssessmentShape, Question};

const CONTRACT_FIELDS: [&str; 4] = ["question", "options", "correctAnswer", "explanation"];

/// The field of a question that broke the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    /// The array element itself is not a JSON object.
    Entry,
    Question,
    Options,
    CorrectAnswer,
    Explanation,
}

impl fmt::Display for QuestionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionField::Entry => "entry",
            QuestionField::Question => "question",
            QuestionField::Options => "options",
            QuestionField::CorrectAnswer => "correctAnswer",
            QuestionField::Explanation => "explanation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Completion is not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("Completion does not match the assessment schema: {0}")]
    SchemaViolation(String),

    #[error("Expected exactly {expected} questions, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Question at index {index} has an invalid `{field}`")]
    QuestionInvalid { index: usize, field: QuestionField },
}

/// Parses and strictly verifies a completion against `shape`.
///
/// On success the questions come back in their original order and otherwise
/// unchanged: keys outside the contract are kept in `Question::extra`.
/// Markdown fences are NOT stripped.
pub fn validate_completion(
    text: &str,
    shape: AssessmentShape,
) -> Result<Vec<Question>, ValidationError> {
    let root: Value = serde_json::from_str(text.trim())
        .map_err(|e| ValidationError::MalformedOutput(e.to_string()))?;

    let object = root.as_object().ok_or_else(|| {
        ValidationError::SchemaViolation(format!(
            "top-level value must be an object, got {}",
            json_type_name(&root)
        ))
    })?;

    let items = match object.get("questions") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::SchemaViolation(format!(
                "`questions` must be an array, got {}",
                json_type_name(other)
            )))
        }
        None => {
            return Err(ValidationError::SchemaViolation(
                "missing `questions` array".to_string(),
            ))
        }
    };

    if items.len() != shape.questions {
        return Err(ValidationError::CountMismatch {
            expected: shape.questions,
            actual: items.len(),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_question(index, item, shape))
        .collect()
}

fn validate_question(
    index: usize,
    item: &Value,
    shape: AssessmentShape,
) -> Result<Question, ValidationError> {
    let invalid = |field| ValidationError::QuestionInvalid { index, field };

    let object = item.as_object().ok_or(invalid(QuestionField::Entry))?;

    let question = non_empty_string(object, "question").ok_or(invalid(QuestionField::Question))?;

    let options = object
        .get("options")
        .and_then(Value::as_array)
        .filter(|options| options.len() == shape.options)
        .and_then(|options| {
            options
                .iter()
                .map(|o| o.as_str().filter(|s| !s.trim().is_empty()).map(str::to_owned))
                .collect::<Option<Vec<String>>>()
        })
        .ok_or(invalid(QuestionField::Options))?;

    // `as_i64` is None for floats, so `1.0` is rejected along with strings.
    let correct_answer = object
        .get("correctAnswer")
        .and_then(Value::as_i64)
        .filter(|&i| i >= 0 && (i as u64) < shape.options as u64)
        .and_then(|i| u8::try_from(i).ok())
        .ok_or(invalid(QuestionField::CorrectAnswer))?;

    let explanation =
        non_empty_string(object, "explanation").ok_or(invalid(QuestionField::Explanation))?;

    let extra = object
        .iter()
        .filter(|(key, _)| !CONTRACT_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Question {
        question,
        options,
        correct_answer,
        explanation,
        extra,
    })
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
