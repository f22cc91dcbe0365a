// src/handlers/answers.rs

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::{achievement, entitlement},
    error::AppError,
    handlers::questions::fetch_question,
    models::{
        achievement::Achievement,
        answer::{AnswerRecord, SubmitAnswerRequest, SubmitAnswerResponse},
        points::PointsProfile,
        subscription::Subscription,
        usage::DailyUsage,
    },
    utils::jwt::Claims,
};

/// Submits an answer to a question.
///
/// * Checks the daily entitlement before anything is written.
/// * Grades by strict string match against the stored correct option.
/// * In one transaction: appends the answer history row, bumps today's
///   usage and the (disciplina, assunto) performance bucket, folds the
///   answer into the points profile and grants any newly crossed
///   achievements (plus their bonus points).
pub async fn submit_answer(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<i64>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    let question = fetch_question(&pool, question_id).await?;

    let subscription = load_subscription(&pool, user_id).await?;
    let today = chrono::Utc::now().date_naive();
    let usage = load_usage(&pool, user_id, today).await?;

    if !entitlement::can_answer(
        Some(user_id),
        &subscription,
        &usage,
        entitlement::FREE_DAILY_QUOTA,
    ) {
        return Err(AppError::Forbidden(
            "Daily question limit reached. Upgrade to premium for unlimited access.".to_string(),
        ));
    }

    let is_correct = payload.answer == question.resposta_correta;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO user_answers (user_id, question_id, user_answer, is_correct)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .bind(&payload.answer)
    .bind(is_correct)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO daily_usage (user_id, date, questions_answered)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, date)
        DO UPDATE SET questions_answered = daily_usage.questions_answered + 1
        "#,
    )
    .bind(user_id)
    .bind(today)
    .execute(&mut *tx)
    .await?;

    let correct_increment: i64 = if is_correct { 1 } else { 0 };
    sqlx::query(
        r#"
        INSERT INTO user_performance_stats
            (user_id, disciplina, assunto, total_questions, correct_answers, last_answered_at)
        VALUES ($1, $2, $3, 1, $4, now())
        ON CONFLICT (user_id, disciplina, assunto)
        DO UPDATE SET
            total_questions = user_performance_stats.total_questions + 1,
            correct_answers = user_performance_stats.correct_answers + $4,
            last_answered_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&question.disciplina)
    .bind(&question.assunto)
    .bind(correct_increment)
    .execute(&mut *tx)
    .await?;

    // Row-lock the profile so concurrent submissions from the same user
    // serialize on the counters.
    let mut profile = sqlx::query_as::<_, PointsProfile>(
        r#"
        SELECT total_points, correct_answers, total_answers,
               streak_days, best_streak, last_activity_date
        FROM user_points WHERE user_id = $1 FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .unwrap_or_default();

    profile.apply_answer(is_correct, today);

    let unlocked = grant_new_achievements(&mut tx, user_id, &mut profile).await?;

    sqlx::query(
        r#"
        INSERT INTO user_points
            (user_id, total_points, correct_answers, total_answers,
             streak_days, best_streak, last_activity_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id) DO UPDATE SET
            total_points = EXCLUDED.total_points,
            correct_answers = EXCLUDED.correct_answers,
            total_answers = EXCLUDED.total_answers,
            streak_days = EXCLUDED.streak_days,
            best_streak = EXCLUDED.best_streak,
            last_activity_date = EXCLUDED.last_activity_date
        "#,
    )
    .bind(user_id)
    .bind(profile.total_points)
    .bind(profile.correct_answers)
    .bind(profile.total_answers)
    .bind(profile.streak_days)
    .bind(profile.best_streak)
    .bind(profile.last_activity_date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let usage_after = DailyUsage {
        questions_answered: usage.questions_answered + 1,
        ..usage
    };
    let remaining_today =
        entitlement::remaining(&subscription, &usage_after, entitlement::FREE_DAILY_QUOTA);

    Ok(Json(SubmitAnswerResponse {
        correct: is_correct,
        resposta_correta: question.resposta_correta,
        comentario: question.comentario,
        remaining_today,
        unlocked,
    }))
}

/// Lists the caller's answer history for one question, newest first.
pub async fn answer_history(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    let history = sqlx::query_as::<_, AnswerRecord>(
        r#"
        SELECT id, user_id, question_id, user_answer, is_correct, answered_at
        FROM user_answers
        WHERE user_id = $1 AND question_id = $2
        ORDER BY answered_at DESC
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(history))
}

pub async fn load_subscription(pool: &PgPool, user_id: i64) -> Result<Subscription, AppError> {
    let subscription = sqlx::query_as::<_, Subscription>(
        "SELECT subscribed, subscription_tier, subscription_end FROM subscribers WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    // No row yet means free tier, not an error.
    Ok(subscription.unwrap_or_default())
}

pub async fn load_usage(
    pool: &PgPool,
    user_id: i64,
    date: chrono::NaiveDate,
) -> Result<DailyUsage, AppError> {
    let usage = sqlx::query_as::<_, DailyUsage>(
        "SELECT user_id, date, questions_answered FROM daily_usage WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(usage.unwrap_or_else(|| DailyUsage::zero(user_id, date)))
}

/// Matches the updated profile against the catalog, inserts grants for
/// newly crossed thresholds and folds their bonus points back into the
/// profile. Grants are unique per (user, achievement); a concurrent
/// duplicate insert is absorbed by ON CONFLICT DO NOTHING.
async fn grant_new_achievements(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: i64,
    profile: &mut PointsProfile,
) -> Result<Vec<Achievement>, AppError> {
    let catalog = sqlx::query_as::<_, Achievement>(
        r#"
        SELECT id, name, description, icon, tier,
               requirement_type, requirement_value, points_reward
        FROM achievements
        ORDER BY requirement_value ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;

    let granted: HashSet<i64> =
        sqlx::query_scalar::<_, i64>("SELECT achievement_id FROM user_achievements WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await?
            .into_iter()
            .collect();

    let unlocked: Vec<Achievement> = achievement::find_newly_unlocked(profile, &granted, &catalog)
        .into_iter()
        .cloned()
        .collect();

    for rule in &unlocked {
        sqlx::query(
            r#"
            INSERT INTO user_achievements (user_id, achievement_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(rule.id)
        .execute(&mut **tx)
        .await?;

        profile.total_points += rule.points_reward;
    }

    Ok(unlocked)
}
