// src/models/report.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Accepted report categories, mirroring the report form options.
pub const REPORT_TYPES: [&str; 5] = [
    "erro_alternativa",
    "erro_gabarito",
    "erro_enunciado",
    "erro_comentario",
    "outros",
];

/// Represents one row of the 'question_reports' table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionReport {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub report_type: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for reporting a defective question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(custom(function = validate_report_type))]
    pub report_type: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

fn validate_report_type(report_type: &str) -> Result<(), validator::ValidationError> {
    if REPORT_TYPES.contains(&report_type) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unknown_report_type"))
    }
}
