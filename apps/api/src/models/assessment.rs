use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub assessment_type: Option<String>,
    pub required_skills: Option<String>,
    pub experience_level: Option<String>,
    /// False when the fallback provider supplied the questions.
    pub is_ai_generated: bool,
    /// `Vec<Question>` stored as an opaque JSON document.
    pub questions: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentResultRow {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub user_id: Uuid,
    pub score: i16,
    /// Chosen option index per question, -1 when unanswered.
    pub answers: Value,
    pub completed_at: DateTime<Utc>,
    /// One of `pending`, `selected`, `rejected`; set by the hiring company.
    pub company_selection_status: String,
    pub selection_message: Option<String>,
}

/// An employer's decision on a candidate's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    Pending,
    Selected,
    Rejected,
}

impl SelectionStatus {
    /// Value stored in `assessment_results.company_selection_status`.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStatus::Pending => "pending",
            SelectionStatus::Selected => "selected",
            SelectionStatus::Rejected => "rejected",
        }
    }
}
