// Prompt text for assessment generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::assessment::generator::AssessmentRequest;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::PromptPair;
use crate::models::question::AssessmentShape;

/// System prompt template.
/// Replace: {question_count}, {option_count}, {example_options}, {max_index}, {json_only}
pub const ASSESSMENT_SYSTEM_TEMPLATE: &str = r#"You are an expert at creating technical assessments. Create a technical assessment with {question_count} multiple choice questions about the given topic.

Return ONLY a JSON object in this exact format:
{
  "questions": [
    {
      "question": "What is...",
      "options": {example_options},
      "correctAnswer": 0,
      "explanation": "Detailed explanation of why this is correct"
    }
  ]
}

Rules:
- Include exactly {question_count} questions
- Each question must have exactly {option_count} options
- correctAnswer must be a number 0-{max_index} indicating the index of the correct option
- Each question must have an explanation
- {json_only}"#;

/// Builds the deterministic system + user message pair for one generation call.
///
/// Blank optional fields are left out of the context block entirely.
pub fn build_assessment_prompt(
    request: &AssessmentRequest,
    topic: &str,
    shape: AssessmentShape,
) -> PromptPair {
    let system = ASSESSMENT_SYSTEM_TEMPLATE
        .replace("{question_count}", &shape.questions.to_string())
        .replace("{option_count}", &shape.options.to_string())
        .replace("{example_options}", &example_options(shape.options))
        .replace("{max_index}", &shape.options.saturating_sub(1).to_string())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION);

    let context: Vec<String> = [
        ("Job title", &request.job_title),
        ("Assessment type", &request.assessment_type),
        ("Required skills", &request.required_skills),
        ("Skills", &request.skills),
        ("Experience level", &request.experience_level),
        ("Company description", &request.company_description),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != topic)
            .map(|v| format!("{label}: {v}"))
    })
    .collect();

    let mut user = format!("Create a technical assessment about: {topic}");
    if !context.is_empty() {
        user.push_str("\n\nContext:\n");
        user.push_str(&context.join("\n"));
    }

    PromptPair { system, user }
}

/// `["option1", "option2", ...]` with one placeholder per option slot.
fn example_options(count: usize) -> String {
    let options: Vec<String> = (1..=count).map(|i| format!("\"option{i}\"")).collect();
    format!("[{}]", options.join(", "))
}
