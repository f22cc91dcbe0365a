// src/models/subscription.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const TIER_FREE: &str = "free";
pub const TIER_PREMIUM: &str = "premium";

/// Represents one row of the 'subscribers' table.
/// Mutated only by the billing collaborator (via the sync endpoint);
/// everything else in this service reads it as-is.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub subscribed: bool,
    pub subscription_tier: String,
    pub subscription_end: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for Subscription {
    fn default() -> Self {
        Subscription {
            subscribed: false,
            subscription_tier: TIER_FREE.to_string(),
            subscription_end: None,
        }
    }
}

impl Subscription {
    /// Unlimited access requires both an active subscription and the
    /// premium tier; either alone is not enough.
    pub fn is_premium(&self) -> bool {
        self.subscribed && self.subscription_tier == TIER_PREMIUM
    }
}

/// Payload pushed by the billing collaborator when a subscription changes.
#[derive(Debug, Deserialize)]
pub struct SyncSubscriptionRequest {
    pub user_id: i64,
    pub subscribed: bool,
    pub subscription_tier: String,
    pub subscription_end: Option<chrono::DateTime<chrono::Utc>>,
}

/// Subscription status plus today's quota, as shown in the banner.
#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub subscribed: bool,
    pub subscription_tier: String,
    pub subscription_end: Option<chrono::DateTime<chrono::Utc>>,
    pub questions_answered_today: i64,
    /// -1 means unlimited.
    pub remaining_today: i64,
}
