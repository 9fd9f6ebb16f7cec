//! Fallback provider: a trusted, local source of sample questions used when no
//! completion could be obtained at all. Output bypasses the validator, so every
//! implementation must already satisfy the assessment contract.

use serde_json::Map;

use crate::assessment::generator::AssessmentRequest;
use crate::models::question::Question;

pub trait FallbackProvider: Send + Sync {
    fn sample_questions(&self, request: &AssessmentRequest, topic: &str) -> Vec<Question>;
}

/// Five hand-authored general software questions, prefixed with the topic or
/// job title so the candidate sees what the assessment was meant to cover.
pub struct StaticSampleProvider;

const SAMPLES: [(&str, [&str; 4], u8, &str); 5] = [
    (
        "What is the primary benefit of using a statically typed language?",
        [
            "Type errors are caught before runtime",
            "Programs always run faster",
            "Binaries are always smaller",
            "It removes the need for tests",
        ],
        0,
        "Static type checking surfaces a whole class of errors during development, before the code ever runs.",
    ),
    (
        "What is the purpose of a side-effect hook such as React's useEffect?",
        [
            "To create new components",
            "To run side effects after rendering",
            "To style components",
            "To route between pages",
        ],
        1,
        "Effect hooks run work such as data fetching or subscriptions after the component has rendered.",
    ),
    (
        "Which HTTP status code indicates that a requested resource was not found?",
        ["200", "301", "404", "500"],
        2,
        "404 Not Found means the server could not locate the requested resource.",
    ),
    (
        "What does an index on a database column primarily improve?",
        [
            "Write throughput",
            "Disk usage",
            "Schema flexibility",
            "Lookup speed for queries filtering on that column",
        ],
        3,
        "An index lets the database locate matching rows without scanning the whole table.",
    ),
    (
        "Which practice best protects an API key used by a backend service?",
        [
            "Reading it from server-side configuration",
            "Embedding it in client-side JavaScript",
            "Committing it to the repository",
            "Passing it as a URL query parameter",
        ],
        0,
        "Secrets belong in server-side configuration where clients and version control never see them.",
    ),
];

impl FallbackProvider for StaticSampleProvider {
    fn sample_questions(&self, request: &AssessmentRequest, topic: &str) -> Vec<Question> {
        let label = request
            .job_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(topic);

        SAMPLES
            .iter()
            .enumerate()
            .map(|(i, (question, options, correct_answer, explanation))| {
                // Even indices carry the topic, odd ones the job title.
                let prefix = if i % 2 == 0 { topic } else { label };
                Question {
                    question: format!("{prefix}: {question}"),
                    options: options.iter().map(|o| o.to_string()).collect(),
                    correct_answer: *correct_answer,
                    explanation: explanation.to_string(),
                    extra: Map::new(),
                }
            })
            .collect()
    }
}
