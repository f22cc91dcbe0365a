// src/models/suggestion.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents one row of the 'exam_statistics' table: how heavily a
/// subject featured in a past exam. Seeded by migration, read-only at
/// runtime. assunto 'Geral' means the row covers the whole discipline.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamStatistic {
    pub disciplina: String,
    pub assunto: String,
    pub total_questions: i64,
    /// Share of the exam's questions, in percent.
    pub percentage: f64,
    /// 'alta', 'media' or 'baixa'.
    pub priority_level: String,
    pub exam_year: i32,
}
