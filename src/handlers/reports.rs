// src/handlers/reports.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::questions::fetch_question,
    models::report::{CreateReportRequest, QuestionReport},
    utils::jwt::Claims,
};

/// Files a defect report against a question (wrong answer key, typo in
/// the stem, and so on). The question must exist; the report is tied to
/// the authenticated caller.
pub async fn report_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<i64>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    fetch_question(&pool, question_id).await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO question_reports (user_id, question_id, report_type, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .bind(&payload.report_type)
    .bind(payload.description.trim())
    .fetch_one(&pool)
    .await?;

    tracing::info!(question_id, report_type = %payload.report_type, "Question reported");

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Lists all question reports, newest first.
/// Admin only.
pub async fn list_reports(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let reports = sqlx::query_as::<_, QuestionReport>(
        r#"
        SELECT id, user_id, question_id, report_type, description, created_at
        FROM question_reports
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(reports))
}
