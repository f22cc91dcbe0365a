// src/domain/entitlement.rs

use crate::models::{subscription::Subscription, usage::DailyUsage};

/// Questions a free-tier user may answer per calendar day.
pub const FREE_DAILY_QUOTA: i64 = 10;

/// Sentinel returned by [`remaining`] for unlimited (premium) access.
pub const UNLIMITED: i64 = -1;

/// Decides whether the caller may answer another question today.
///
/// An unidentified caller is always denied, regardless of usage.
/// Premium subscribers are never limited; everyone else is capped at
/// `free_quota` answers per day.
pub fn can_answer(
    user_id: Option<i64>,
    subscription: &Subscription,
    usage: &DailyUsage,
    free_quota: i64,
) -> bool {
    if user_id.is_none() {
        return false;
    }
    if subscription.is_premium() {
        return true;
    }
    usage.questions_answered < free_quota
}

/// Questions left today: [`UNLIMITED`] for premium, otherwise the
/// non-negative remainder of the quota.
pub fn remaining(subscription: &Subscription, usage: &DailyUsage, free_quota: i64) -> i64 {
    if subscription.is_premium() {
        return UNLIMITED;
    }
    (free_quota - usage.questions_answered).max(0)
}
