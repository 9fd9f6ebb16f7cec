use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single multiple-choice question as returned to clients and stored verbatim
/// in `assessments.questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    /// Index-addressed: `correct_answer` points into this list.
    pub options: Vec<String>,
    pub correct_answer: u8,
    pub explanation: String,
    /// Any further keys the model emitted, carried through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fixed counts every assessment must satisfy.
/// Read by both the prompt builder and the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentShape {
    pub questions: usize,
    pub options: usize,
}

impl AssessmentShape {
    pub const DEFAULT: AssessmentShape = AssessmentShape {
        questions: 5,
        options: 4,
    };
}

impl Default for AssessmentShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}
