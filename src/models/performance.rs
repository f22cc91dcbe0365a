// src/models/performance.rs

use serde::Serialize;
use sqlx::FromRow;

/// Aggregated counters for one (user, disciplina, assunto) triple.
/// Represents one row of 'user_performance_stats'. Counters only ever
/// grow; accuracy is always derived, never stored.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PerformanceBucket {
    pub disciplina: String,
    pub assunto: String,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub last_answered_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PerformanceBucket {
    /// Fraction of correct answers in [0, 1]. Defined as 0 for an empty
    /// bucket so no aggregation path ever produces NaN.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_questions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(total: i64, correct: i64) -> PerformanceBucket {
        PerformanceBucket {
            disciplina: "Direito Penal".to_string(),
            assunto: "Crimes contra a vida".to_string(),
            total_questions: total,
            correct_answers: correct,
            last_answered_at: None,
        }
    }

    #[test]
    fn accuracy_of_empty_bucket_is_zero() {
        assert_eq!(bucket(0, 0).accuracy(), 0.0);
    }

    #[test]
    fn accuracy_is_correct_over_total() {
        assert!((bucket(10, 3).accuracy() - 0.3).abs() < 1e-9);
    }
}
