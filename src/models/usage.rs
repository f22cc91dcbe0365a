// src/models/usage.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents one row of the 'daily_usage' table.
/// One row per user per calendar day; the quota resets implicitly when
/// the date key rolls over.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyUsage {
    pub user_id: i64,
    pub date: chrono::NaiveDate,
    pub questions_answered: i64,
}

impl DailyUsage {
    /// Zero state for a user with no row yet today.
    pub fn zero(user_id: i64, date: chrono::NaiveDate) -> Self {
        DailyUsage {
            user_id,
            date,
            questions_answered: 0,
        }
    }
}
