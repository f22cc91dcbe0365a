// src/handlers/suggestions.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    domain::suggestion,
    error::AppError,
    models::{performance::PerformanceBucket, suggestion::ExamStatistic},
    utils::jwt::Claims,
};

/// Historical exam composition, heaviest subjects first. Public: the
/// weights are the same for every user.
pub async fn exam_statistics(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let stats = load_exam_statistics(&pool).await?;
    Ok(Json(stats))
}

/// Personalized study suggestions, composed on read from the caller's
/// performance buckets and the historical exam weights. A user with no
/// history still gets the high-priority exam subjects.
pub async fn my_suggestions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    let buckets = sqlx::query_as::<_, PerformanceBucket>(
        r#"
        SELECT disciplina, assunto, total_questions, correct_answers, last_answered_at
        FROM user_performance_stats
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let stats = load_exam_statistics(&pool).await?;

    Ok(Json(suggestion::build_suggestions(&buckets, &stats)))
}

async fn load_exam_statistics(pool: &PgPool) -> Result<Vec<ExamStatistic>, AppError> {
    let stats = sqlx::query_as::<_, ExamStatistic>(
        r#"
        SELECT disciplina, assunto, total_questions, percentage, priority_level, exam_year
        FROM exam_statistics
        ORDER BY percentage DESC, disciplina, assunto
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(stats)
}
