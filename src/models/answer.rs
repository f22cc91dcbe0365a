// src/models/answer.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::achievement::Achievement;

/// Represents one row of the 'user_answers' table.
/// Answers are append-only history: a user may attempt the same question
/// any number of times and every attempt is retained.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerRecord {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub user_answer: String,
    pub is_correct: bool,
    pub answered_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting an answer to a question.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}

/// Full result of an answer submission.
#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub resposta_correta: String,
    pub comentario: String,
    /// Questions still available today; -1 means unlimited (premium).
    pub remaining_today: i64,
    /// Achievements unlocked by this submission, in catalog order.
    pub unlocked: Vec<Achievement>,
}
