// src/models/achievement.rs

use serde::Serialize;
use sqlx::FromRow;

/// One rule of the static achievement catalog ('achievements' table).
/// Seeded by migration and read-only at runtime.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Display tier: 'bronze', 'silver', 'gold' or 'platinum'.
    pub tier: String,
    /// Which profile counter the rule reads: 'total_points',
    /// 'correct_answers', 'total_answers' or 'streak_days'.
    pub requirement_type: String,
    pub requirement_value: i64,
    /// Bonus points granted when the achievement unlocks.
    pub points_reward: i64,
}

/// One grant row of 'user_achievements', joined with its catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EarnedAchievement {
    pub earned_at: chrono::DateTime<chrono::Utc>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub achievement: Achievement,
}

/// A still-locked achievement with partial progress, for progress bars.
#[derive(Debug, Serialize)]
pub struct LockedAchievement {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub current_value: i64,
    /// Fraction of the requirement reached, clamped to [0, 1].
    pub progress: f64,
}
