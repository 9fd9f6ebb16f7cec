use crate::models::question::Question;

/// Marker stored in `answers` for a question the candidate skipped.
pub const UNANSWERED: i32 = -1;

/// Percentage of correctly answered questions, rounded half away from zero.
///
/// `answers[i]` is the chosen option index for `questions[i]`; missing entries
/// and `UNANSWERED` count as wrong. An empty assessment scores 0.
pub fn compute_score(questions: &[Question], answers: &[i32]) -> u8 {
    if questions.is_empty() {
        return 0;
    }

    let correct = questions
        .iter()
        .zip(answers)
        .filter(|&(q, &a)| a == i32::from(q.correct_answer))
        .count();

    (100.0 * correct as f64 / questions.len() as f64).round() as u8
}
