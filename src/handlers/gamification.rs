// src/handlers/gamification.rs

use std::collections::HashSet;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::{
    domain::achievement as matcher,
    error::AppError,
    models::{
        achievement::{Achievement, EarnedAchievement, LockedAchievement},
        points::PointsProfile,
    },
    utils::jwt::Claims,
};

/// The caller's gamification snapshot: points profile plus the catalog
/// split into unlocked and locked (with partial progress).
#[derive(Debug, Serialize)]
pub struct GamificationResponse {
    pub points: PointsProfile,
    pub unlocked: Vec<EarnedAchievement>,
    pub locked: Vec<LockedAchievement>,
}

/// One leaderboard row, ordered by total points.
#[derive(Debug, FromRow, Serialize)]
pub struct RankingEntry {
    pub user_id: i64,
    pub full_name: Option<String>,
    pub email: String,
    pub total_points: i64,
    pub correct_answers: i64,
    pub total_answers: i64,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub ranking: Vec<RankingEntry>,
    /// The caller's 1-based position; 0 when outside the leaderboard.
    pub my_position: usize,
}

const RANKING_LIMIT: i64 = 10;

/// Points, unlocked achievements and locked achievements with progress.
pub async fn my_gamification(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    // Brand-new users have no points row; the zero profile stands in.
    let points = sqlx::query_as::<_, PointsProfile>(
        r#"
        SELECT total_points, correct_answers, total_answers,
               streak_days, best_streak, last_activity_date
        FROM user_points WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .unwrap_or_default();

    let unlocked = sqlx::query_as::<_, EarnedAchievement>(
        r#"
        SELECT ua.earned_at,
               a.id, a.name, a.description, a.icon, a.tier,
               a.requirement_type, a.requirement_value, a.points_reward
        FROM user_achievements ua
        JOIN achievements a ON a.id = ua.achievement_id
        WHERE ua.user_id = $1
        ORDER BY ua.earned_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let catalog = sqlx::query_as::<_, Achievement>(
        r#"
        SELECT id, name, description, icon, tier,
               requirement_type, requirement_value, points_reward
        FROM achievements
        ORDER BY requirement_value ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let unlocked_ids: HashSet<i64> = unlocked.iter().map(|e| e.achievement.id).collect();
    let locked: Vec<LockedAchievement> = catalog
        .into_iter()
        .filter(|a| !unlocked_ids.contains(&a.id))
        .map(|a| LockedAchievement {
            current_value: matcher::counter_value(&points, &a),
            progress: matcher::progress_fraction(&points, &a),
            achievement: a,
        })
        .collect();

    Ok(Json(GamificationResponse {
        points,
        unlocked,
        locked,
    }))
}

/// Top users by total points. Public; when the caller presents a valid
/// token their own position is included (0 when outside the top list).
pub async fn ranking(
    State(pool): State<PgPool>,
    claims: Option<Extension<Claims>>,
) -> Result<impl IntoResponse, AppError> {
    let ranking = sqlx::query_as::<_, RankingEntry>(
        r#"
        SELECT up.user_id, u.full_name, u.email,
               up.total_points, up.correct_answers, up.total_answers
        FROM user_points up
        JOIN users u ON u.id = up.user_id
        ORDER BY up.total_points DESC, up.user_id ASC
        LIMIT $1
        "#,
    )
    .bind(RANKING_LIMIT)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch ranking: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let my_position = claims
        .as_ref()
        .and_then(|Extension(c)| c.user_id())
        .and_then(|id| ranking.iter().position(|r| r.user_id == id))
        .map(|idx| idx + 1)
        .unwrap_or(0);

    Ok(Json(RankingResponse {
        ranking,
        my_position,
    }))
}
