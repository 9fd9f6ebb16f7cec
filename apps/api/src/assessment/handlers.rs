//! Axum route handlers for the Assessment API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::generator::{AssessmentRequest, QuestionSource};
use crate::assessment::scoring::{compute_score, UNANSWERED};
use crate::assessment::stats::DashboardStats;
use crate::assessment::store::{self, NewAssessment};
use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::models::assessment::{AssessmentResultRow, AssessmentRow, SelectionStatus};
use crate::models::question::Question;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateAssessmentResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub user_id: Uuid,
    pub company_name: Option<String>,
    #[serde(flatten)]
    pub assessment: AssessmentRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub user_id: Uuid,
    /// Chosen option index per question; -1 for unanswered.
    pub answers: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSelectionRequest {
    pub status: SelectionStatus,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-assessment
///
/// Generates and validates questions without persisting them.
pub async fn handle_generate_assessment(
    State(state): State<AppState>,
    AppJson(request): AppJson<AssessmentRequest>,
) -> Result<Json<GenerateAssessmentResponse>, AppError> {
    let generated = state.generator.generate(&request).await?;
    Ok(Json(GenerateAssessmentResponse {
        questions: generated.questions,
    }))
}

/// POST /api/v1/assessments
///
/// Generates an assessment and stores it with its job metadata.
pub async fn handle_create_assessment(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentRow>), AppError> {
    let generated = state.generator.generate(&request.assessment).await?;
    let assessment = &request.assessment;

    let row = store::insert_assessment(
        &state.db,
        NewAssessment {
            user_id: request.user_id,
            topic: &generated.topic,
            job_title: assessment.job_title.as_deref(),
            company_name: request.company_name.as_deref(),
            assessment_type: assessment.assessment_type.as_deref(),
            required_skills: assessment
                .required_skills
                .as_deref()
                .or(assessment.skills.as_deref()),
            experience_level: assessment.experience_level.as_deref(),
            is_ai_generated: generated.source == QuestionSource::Generated,
            questions: &generated.questions,
        },
    )
    .await?;

    tracing::info!("Stored assessment {} for user {}", row.id, row.user_id);

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/assessments?user_id=
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<AssessmentRow>>, AppError> {
    let rows = store::list_assessments_for_user(&state.db, params.user_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    AppPath(assessment_id): AppPath<Uuid>,
) -> Result<Json<AssessmentRow>, AppError> {
    store::get_assessment(&state.db, assessment_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))
}

/// POST /api/v1/assessments/:id/results
///
/// Scores the submitted answers against the stored questions and records the result.
pub async fn handle_submit_result(
    State(state): State<AppState>,
    AppPath(assessment_id): AppPath<Uuid>,
    AppJson(request): AppJson<SubmitResultRequest>,
) -> Result<(StatusCode, Json<AssessmentResultRow>), AppError> {
    let assessment = store::get_assessment(&state.db, assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    let questions: Vec<Question> = serde_json::from_value(assessment.questions).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Stored questions for assessment {assessment_id} are unreadable: {e}"
        ))
    })?;

    check_answers(&questions, &request.answers)?;

    let score = compute_score(&questions, &request.answers);
    let row = store::insert_result(
        &state.db,
        assessment_id,
        request.user_id,
        score,
        &request.answers,
    )
    .await?;

    tracing::info!(
        "User {} scored {}% on assessment {}",
        request.user_id,
        score,
        assessment_id
    );

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/results?user_id=
pub async fn handle_list_results(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<AssessmentResultRow>>, AppError> {
    let rows = store::list_results_for_user(&state.db, params.user_id).await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/results/:id/selection
///
/// Records the hiring company's decision on a result. A blank message is stored as none.
pub async fn handle_update_selection(
    State(state): State<AppState>,
    AppPath(result_id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateSelectionRequest>,
) -> Result<Json<AssessmentResultRow>, AppError> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let row = store::update_selection(&state.db, result_id, request.status, message)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Result {result_id} not found")))?;

    tracing::info!("Result {} marked {}", result_id, request.status.as_str());

    Ok(Json(row))
}

/// GET /api/v1/stats?user_id=
pub async fn handle_get_stats(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let total = store::count_assessments_for_user(&state.db, params.user_id).await?;
    let scores = store::list_scores_for_user(&state.db, params.user_id).await?;
    Ok(Json(DashboardStats::compute(
        u64::try_from(total).unwrap_or(0),
        &scores,
    )))
}

/// One answer per question, each either -1 or a valid option index.
fn check_answers(questions: &[Question], answers: &[i32]) -> Result<(), AppError> {
    if answers.len() != questions.len() {
        return Err(AppError::Validation(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }

    for (i, (question, &answer)) in questions.iter().zip(answers).enumerate() {
        let in_range = answer >= 0 && (answer as usize) < question.options.len();
        if answer != UNANSWERED && !in_range {
            return Err(AppError::Validation(format!(
                "Answer {answer} for question {i} is not a valid option index"
            )));
        }
    }

    Ok(())
}
