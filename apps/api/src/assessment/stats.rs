//! Per-user dashboard figures.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_assessments: u64,
    pub completed_tests: u64,
    pub highest_score: i16,
    /// Assessments without a recorded result; never negative.
    pub pending_tests: u64,
}

impl DashboardStats {
    /// `scores` holds one entry per recorded result.
    pub fn compute(total_assessments: u64, scores: &[i16]) -> Self {
        let completed_tests = scores.len() as u64;
        Self {
            total_assessments,
            completed_tests,
            highest_score: scores.iter().copied().fold(0, i16::max),
            pending_tests: total_assessments.saturating_sub(completed_tests),
        }
    }
}
