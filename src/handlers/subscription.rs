// src/handlers/subscription.rs

use axum::{
    Extension, Json,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    domain::entitlement,
    error::AppError,
    handlers::answers::{load_subscription, load_usage},
    models::subscription::{SubscriptionStatusResponse, SyncSubscriptionRequest},
    state::AppState,
    utils::jwt::Claims,
};

/// Header carrying the shared secret on billing webhook calls.
const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

/// Current subscription status plus today's usage and remaining quota.
pub async fn my_subscription(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    let subscription = load_subscription(&pool, user_id).await?;
    let today = chrono::Utc::now().date_naive();
    let usage = load_usage(&pool, user_id, today).await?;

    let remaining_today =
        entitlement::remaining(&subscription, &usage, entitlement::FREE_DAILY_QUOTA);

    Ok(Json(SubscriptionStatusResponse {
        subscribed: subscription.subscribed,
        subscription_tier: subscription.subscription_tier,
        subscription_end: subscription.subscription_end,
        questions_answered_today: usage.questions_answered,
        remaining_today,
    }))
}

/// Asks the billing collaborator for a checkout session and returns the
/// redirect URL. The session itself (and the later tier change) is fully
/// owned by the collaborator; a failure here is reported, nothing local
/// changes.
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims
        .user_id()
        .ok_or(AppError::AuthError("Invalid token subject".to_string()))?;

    let checkout_url = state
        .config
        .billing_checkout_url
        .as_deref()
        .ok_or_else(|| AppError::Upstream("Billing collaborator is not configured".to_string()))?;

    let email: String = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let response = state
        .http
        .post(checkout_url)
        .json(&json!({ "user_id": user_id, "email": email }))
        .send()
        .await?
        .error_for_status()?;

    let body: serde_json::Value = response.json().await?;
    let url = body
        .get("url")
        .and_then(|u| u.as_str())
        .ok_or_else(|| AppError::Upstream("Billing response had no checkout URL".to_string()))?;

    Ok(Json(json!({ "url": url })))
}

/// Upserts the subscriber row from a billing webhook push.
///
/// This is the single write path into 'subscribers'; the rest of the
/// service treats that table as read-only.
pub async fn sync_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SyncSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let expected = state
        .config
        .billing_webhook_secret
        .as_deref()
        .ok_or_else(|| AppError::AuthError("Webhook secret is not configured".to_string()))?;

    let provided = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected) {
        return Err(AppError::AuthError("Invalid webhook token".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO subscribers (user_id, subscribed, subscription_tier, subscription_end, updated_at)
        VALUES ($1, $2, $3, $4, now())
        ON CONFLICT (user_id) DO UPDATE SET
            subscribed = EXCLUDED.subscribed,
            subscription_tier = EXCLUDED.subscription_tier,
            subscription_end = EXCLUDED.subscription_end,
            updated_at = now()
        "#,
    )
    .bind(payload.user_id)
    .bind(payload.subscribed)
    .bind(&payload.subscription_tier)
    .bind(payload.subscription_end)
    .execute(&state.pool)
    .await?;

    tracing::info!(
        user_id = payload.user_id,
        tier = %payload.subscription_tier,
        "Subscription synced from billing webhook"
    );

    Ok(Json(json!({ "synced": true })))
}
