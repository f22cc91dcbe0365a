// src/models/points.rs

use chrono::{Days, NaiveDate};
use serde::Serialize;
use sqlx::FromRow;

/// Points awarded for each correctly answered question.
pub const POINTS_PER_CORRECT: i64 = 10;

/// Cumulative gamification counters for one user ('user_points' table).
/// A brand-new user has no row; `Default` is the zero state and every
/// consumer must accept it.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct PointsProfile {
    pub total_points: i64,
    pub correct_answers: i64,
    pub total_answers: i64,
    pub streak_days: i64,
    pub best_streak: i64,
    pub last_activity_date: Option<NaiveDate>,
}

impl PointsProfile {
    /// Folds one graded answer into the profile.
    ///
    /// Invariants kept: correct_answers <= total_answers and
    /// streak_days <= best_streak after every call.
    pub fn apply_answer(&mut self, correct: bool, today: NaiveDate) {
        self.total_answers += 1;
        if correct {
            self.correct_answers += 1;
            self.total_points += POINTS_PER_CORRECT;
        }

        let yesterday = today.checked_sub_days(Days::new(1));
        self.streak_days = match self.last_activity_date {
            Some(last) if last == today => self.streak_days,
            Some(last) if Some(last) == yesterday => self.streak_days + 1,
            _ => 1,
        };
        self.best_streak = self.best_streak.max(self.streak_days);
        self.last_activity_date = Some(today);
    }
}
