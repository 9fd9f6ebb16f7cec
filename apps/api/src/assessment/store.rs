//! Persistence for assessments and candidate results.
//!
//! Questions are stored verbatim as a JSONB document; nothing here re-validates them.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::assessment::{AssessmentResultRow, AssessmentRow, SelectionStatus};
use crate::models::question::Question;

/// Parameters for inserting a freshly generated assessment.
pub struct NewAssessment<'a> {
    pub user_id: Uuid,
    pub topic: &'a str,
    pub job_title: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub assessment_type: Option<&'a str>,
    pub required_skills: Option<&'a str>,
    pub experience_level: Option<&'a str>,
    pub is_ai_generated: bool,
    pub questions: &'a [Question],
}

pub async fn insert_assessment(
    pool: &PgPool,
    params: NewAssessment<'_>,
) -> Result<AssessmentRow, sqlx::Error> {
    let questions = sqlx::types::Json(params.questions);

    sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments
            (id, user_id, topic, job_title, company_name, assessment_type,
             required_skills, experience_level, is_ai_generated, questions)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(params.user_id)
    .bind(params.topic)
    .bind(params.job_title)
    .bind(params.company_name)
    .bind(params.assessment_type)
    .bind(params.required_skills)
    .bind(params.experience_level)
    .bind(params.is_ai_generated)
    .bind(questions)
    .fetch_one(pool)
    .await
}

pub async fn get_assessment(
    pool: &PgPool,
    assessment_id: Uuid,
) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
        .bind(assessment_id)
        .fetch_optional(pool)
        .await
}

/// Newest first.
pub async fn list_assessments_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        "SELECT * FROM assessments WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_result(
    pool: &PgPool,
    assessment_id: Uuid,
    user_id: Uuid,
    score: u8,
    answers: &[i32],
) -> Result<AssessmentResultRow, sqlx::Error> {
    sqlx::query_as::<_, AssessmentResultRow>(
        r#"
        INSERT INTO assessment_results (id, assessment_id, user_id, score, answers)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(assessment_id)
    .bind(user_id)
    .bind(i16::from(score))
    .bind(sqlx::types::Json(answers))
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_results_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AssessmentResultRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentResultRow>(
        "SELECT * FROM assessment_results WHERE user_id = $1 ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Records the hiring company's decision. `None` when no such result exists.
pub async fn update_selection(
    pool: &PgPool,
    result_id: Uuid,
    status: SelectionStatus,
    message: Option<&str>,
) -> Result<Option<AssessmentResultRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentResultRow>(
        r#"
        UPDATE assessment_results
        SET company_selection_status = $2, selection_message = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(result_id)
    .bind(status.as_str())
    .bind(message)
    .fetch_optional(pool)
    .await
}

pub async fn count_assessments_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assessments WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn list_scores_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<i16>, sqlx::Error> {
    sqlx::query_scalar::<_, i16>("SELECT score FROM assessment_results WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}
