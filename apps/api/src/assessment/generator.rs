//! Assessment Generation: orchestrates one generation call.
//!
//! Flow: effective topic → build prompt → one completion call → strict validation.
//!
//! When the completion call itself fails, the configured `FailurePolicy` decides
//! between propagating the error and substituting fallback sample questions.
//! Validation failures are never masked by the fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::assessment::fallback::FallbackProvider;
use crate::assessment::prompts::build_assessment_prompt;
use crate::assessment::validator::{validate_completion, ValidationError};
use crate::llm_client::{CompletionProvider, LlmError};
use crate::models::question::{AssessmentShape, Question};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for assessment generation. Field set varies by call site:
/// candidates send `topic`, employers send `skills` / `jobTitle`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub topic: Option<String>,
    pub job_title: Option<String>,
    pub assessment_type: Option<String>,
    pub required_skills: Option<String>,
    pub company_description: Option<String>,
    pub skills: Option<String>,
    pub experience_level: Option<String>,
}

impl AssessmentRequest {
    /// First non-blank of `topic`, `requiredSkills`, `skills`, `jobTitle`.
    pub fn effective_topic(&self) -> Option<&str> {
        [
            &self.topic,
            &self.required_skills,
            &self.skills,
            &self.job_title,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref().map(str::trim))
        .find(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct GeneratedAssessment {
    pub topic: String,
    pub questions: Vec<Question>,
    pub source: QuestionSource,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("A topic, skills or job title is required")]
    MissingTopic,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream service error: {0}")]
    UpstreamService(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            missing @ LlmError::MissingApiKey => {
                GenerationError::Configuration(missing.to_string())
            }
            other => GenerationError::UpstreamService(other.to_string()),
        }
    }
}

/// What to do when no completion could be obtained.
#[derive(Clone)]
pub enum FailurePolicy {
    Propagate,
    Fallback(Arc<dyn FallbackProvider>),
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Stateless per call; shared across handlers behind an `Arc`.
pub struct AssessmentGenerator {
    provider: Arc<dyn CompletionProvider>,
    shape: AssessmentShape,
    on_failure: FailurePolicy,
}

impl AssessmentGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, on_failure: FailurePolicy) -> Self {
        Self {
            provider,
            shape: AssessmentShape::DEFAULT,
            on_failure,
        }
    }

    /// Generates one assessment. Exactly one completion call, no retry.
    pub async fn generate(
        &self,
        request: &AssessmentRequest,
    ) -> Result<GeneratedAssessment, GenerationError> {
        let topic = request
            .effective_topic()
            .ok_or(GenerationError::MissingTopic)?
            .to_string();
        info!("Generating assessment for topic: {topic}");

        let prompt = build_assessment_prompt(request, &topic, self.shape);

        let completion = match self.provider.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                let error = GenerationError::from(e);
                return match &self.on_failure {
                    FailurePolicy::Propagate => Err(error),
                    FailurePolicy::Fallback(fallback) => {
                        warn!(
                            "Completion unavailable, using sample questions for '{topic}': {error}"
                        );
                        Ok(GeneratedAssessment {
                            questions: fallback.sample_questions(request, &topic),
                            source: QuestionSource::Fallback,
                            topic,
                        })
                    }
                };
            }
        };

        let questions = validate_completion(&completion, self.shape).map_err(|e| {
            warn!("Rejected completion for '{topic}': {e}");
            e
        })?;

        info!(
            "Generated {} questions for topic: {topic}",
            questions.len()
        );

        Ok(GeneratedAssessment {
            topic,
            questions,
            source: QuestionSource::Generated,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
