// src/handlers/statistics.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    domain::progress::{
        self, DisciplineBreakdown, OverallStats,
    },
    error::AppError,
    models::performance::PerformanceBucket,
    utils::jwt::Claims,
};

/// Everything the statistics screens need in one payload.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub overall: OverallStats,
    pub subjects: Vec<PerformanceBucket>,
    pub disciplines: Vec<DisciplineBreakdown>,
    pub weak_areas: Vec<PerformanceBucket>,
    pub needs_practice: Vec<PerformanceBucket>,
    pub top_subjects: Vec<PerformanceBucket>,
    pub bottom_subjects: Vec<PerformanceBucket>,
}

/// Current user's performance statistics.
///
/// A user with no answered questions gets zero-valued overall stats and
/// empty lists, never an error.
pub async fn my_statistics(
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
        ORDER BY disciplina, assunto
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let response = StatisticsResponse {
        overall: progress::aggregate(&buckets),
        disciplines: progress::discipline_breakdown(&buckets),
        weak_areas: progress::weak_areas(&buckets),
        needs_practice: progress::needs_practice(&buckets),
        top_subjects: progress::top_subjects(&buckets),
        bottom_subjects: progress::bottom_subjects(&buckets),
        subjects: buckets,
    };

    Ok(Json(response))
}
