// src/domain/progress.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::performance::PerformanceBucket;

/// A subject needs at least this many attempts before its accuracy is
/// considered a meaningful signal.
pub const MIN_ATTEMPTS: i64 = 3;

/// Subjects below this accuracy (with enough attempts) are weak areas.
pub const WEAK_ACCURACY_CEILING: f64 = 0.70;

/// Subjects with fewer attempts than this still need practice.
pub const PRACTICE_FLOOR: i64 = 5;

/// How many subjects the top/bottom chart lists carry.
pub const CHART_LIMIT: usize = 5;

/// Overall statistics folded from all of a user's performance buckets.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_answers: i64,
    pub total_correct: i64,
    /// Overall fraction correct in [0, 1]; 0 when nothing was answered.
    pub accuracy: f64,
    pub disciplines_count: usize,
    pub subjects_count: usize,
}

/// Per-discipline roll-up of all its subject buckets.
#[derive(Debug, PartialEq, Serialize)]
pub struct DisciplineBreakdown {
    pub disciplina: String,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub accuracy: f64,
}

/// Folds the bucket list into overall statistics.
///
/// The fold is keyed on group values, not positions, so any permutation
/// of the input yields the same result. An empty list yields all zeros.
pub fn aggregate(buckets: &[PerformanceBucket]) -> OverallStats {
    let total_answers: i64 = buckets.iter().map(|b| b.total_questions).sum();
    let total_correct: i64 = buckets.iter().map(|b| b.correct_answers).sum();
    let accuracy = if total_answers == 0 {
        0.0
    } else {
        total_correct as f64 / total_answers as f64
    };

    let disciplines: std::collections::BTreeSet<&str> =
        buckets.iter().map(|b| b.disciplina.as_str()).collect();

    OverallStats {
        total_answers,
        total_correct,
        accuracy,
        disciplines_count: disciplines.len(),
        subjects_count: buckets.len(),
    }
}

/// Subjects with enough attempts and accuracy below the ceiling, worst
/// first. Ties on accuracy are broken by fewer attempts first.
pub fn weak_areas(buckets: &[PerformanceBucket]) -> Vec<PerformanceBucket> {
    let mut weak: Vec<PerformanceBucket> = buckets
        .iter()
        .filter(|b| b.total_questions >= MIN_ATTEMPTS && b.accuracy() < WEAK_ACCURACY_CEILING)
        .cloned()
        .collect();
    weak.sort_by(|a, b| {
        a.accuracy()
            .total_cmp(&b.accuracy())
            .then(a.total_questions.cmp(&b.total_questions))
    });
    weak
}

/// Subjects with too few attempts to judge, fewest attempts first.
pub fn needs_practice(buckets: &[PerformanceBucket]) -> Vec<PerformanceBucket> {
    let mut sparse: Vec<PerformanceBucket> = buckets
        .iter()
        .filter(|b| b.total_questions < PRACTICE_FLOOR)
        .cloned()
        .collect();
    sparse.sort_by_key(|b| b.total_questions);
    sparse
}

/// The user's best subjects (enough attempts, highest accuracy first).
pub fn top_subjects(buckets: &[PerformanceBucket]) -> Vec<PerformanceBucket> {
    let mut qualified = qualified(buckets);
    qualified.sort_by(|a, b| b.accuracy().total_cmp(&a.accuracy()));
    qualified.truncate(CHART_LIMIT);
    qualified
}

/// The user's worst subjects (enough attempts, lowest accuracy first).
pub fn bottom_subjects(buckets: &[PerformanceBucket]) -> Vec<PerformanceBucket> {
    let mut qualified = qualified(buckets);
    qualified.sort_by(|a, b| a.accuracy().total_cmp(&b.accuracy()));
    qualified.truncate(CHART_LIMIT);
    qualified
}

fn qualified(buckets: &[PerformanceBucket]) -> Vec<PerformanceBucket> {
    buckets
        .iter()
        .filter(|b| b.total_questions >= MIN_ATTEMPTS)
        .cloned()
        .collect()
}

/// Sums each discipline's subject buckets, alphabetically by discipline.
pub fn discipline_breakdown(buckets: &[PerformanceBucket]) -> Vec<DisciplineBreakdown> {
    let mut grouped: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for b in buckets {
        let entry = grouped.entry(b.disciplina.as_str()).or_insert((0, 0));
        entry.0 += b.total_questions;
        entry.1 += b.correct_answers;
    }
    grouped
        .into_iter()
        .map(|(disciplina, (total, correct))| DisciplineBreakdown {
            disciplina: disciplina.to_string(),
            total_questions: total,
            correct_answers: correct,
            accuracy: if total == 0 {
                0.0
            } else {
                correct as f64 / total as f64
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(disciplina: &str, assunto: &str, total: i64, correct: i64) -> PerformanceBucket {
        PerformanceBucket {
            disciplina: disciplina.to_string(),
            assunto: assunto.to_string(),
            total_questions: total,
            correct_answers: correct,
            last_answered_at: None,
        }
    }

    #[test]
    fn empty_input_yields_all_zeros() {
        let stats = aggregate(&[]);
        assert_eq!(stats, OverallStats::default());
        assert_eq!(stats.accuracy, 0.0);
    }

    #[test]
    fn aggregate_sums_counters_and_counts_groups() {
        let buckets = [
            bucket("Direito Penal", "Crimes contra a vida", 10, 3),
            bucket("Direito Penal", "Teoria do crime", 4, 4),
            bucket("Português", "Crase", 6, 5),
        ];
        let stats = aggregate(&buckets);
        assert_eq!(stats.total_answers, 20);
        assert_eq!(stats.total_correct, 12);
        assert!((stats.accuracy - 0.6).abs() < 1e-9);
        assert_eq!(stats.disciplines_count, 2);
        assert_eq!(stats.subjects_count, 3);
    }

    #[test]
    fn aggregate_is_invariant_under_permutation() {
        let a = bucket("Direito Penal", "Crimes contra a vida", 10, 3);
        let b = bucket("Português", "Crase", 6, 5);
        let c = bucket("Informática", "Redes", 2, 2);
        assert_eq!(
            aggregate(&[a.clone(), b.clone(), c.clone()]),
            aggregate(&[c, a, b])
        );
    }

    #[test]
    fn weak_areas_apply_the_minimum_attempts_floor() {
        let buckets = [
            bucket("Direito Penal", "Crimes contra a vida", 10, 3),
            // 100% accuracy, excluded by accuracy ceiling anyway.
            bucket("Português", "Crase", 2, 2),
            // 0% accuracy but only 2 attempts: the floor must exclude it.
            bucket("Informática", "Redes", 2, 0),
        ];
        let weak = weak_areas(&buckets);
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].assunto, "Crimes contra a vida");
    }

    #[test]
    fn weak_areas_sort_worst_first_with_attempts_tiebreak() {
        let buckets = [
            bucket("A", "meio", 10, 5),
            bucket("B", "pior", 10, 2),
            // Same accuracy as "meio" but fewer attempts: surfaces first.
            bucket("C", "empate", 4, 2),
        ];
        let weak = weak_areas(&buckets);
        let order: Vec<&str> = weak.iter().map(|b| b.assunto.as_str()).collect();
        assert_eq!(order, ["pior", "empate", "meio"]);
    }

    #[test]
    fn needs_practice_lists_sparse_subjects_fewest_first() {
        let buckets = [
            bucket("A", "quase", 4, 4),
            bucket("B", "ok", 5, 1),
            bucket("C", "novo", 1, 0),
        ];
        let sparse = needs_practice(&buckets);
        let order: Vec<&str> = sparse.iter().map(|b| b.assunto.as_str()).collect();
        assert_eq!(order, ["novo", "quase"]);
    }

    #[test]
    fn chart_lists_are_capped_and_require_min_attempts() {
        let mut buckets = Vec::new();
        for i in 0..8 {
            buckets.push(bucket("D", &format!("assunto-{i}"), 10, i));
        }
        buckets.push(bucket("D", "sem-amostra", 1, 1));

        let top = top_subjects(&buckets);
        let bottom = bottom_subjects(&buckets);
        assert_eq!(top.len(), CHART_LIMIT);
        assert_eq!(bottom.len(), CHART_LIMIT);
        assert_eq!(top[0].assunto, "assunto-7");
        assert_eq!(bottom[0].assunto, "assunto-0");
        assert!(top.iter().all(|b| b.assunto != "sem-amostra"));
    }

    #[test]
    fn discipline_breakdown_groups_and_derives_accuracy() {
        let buckets = [
            bucket("Direito Penal", "A", 6, 3),
            bucket("Direito Penal", "B", 4, 3),
            bucket("Português", "C", 5, 5),
        ];
        let breakdown = discipline_breakdown(&buckets);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].disciplina, "Direito Penal");
        assert_eq!(breakdown[0].total_questions, 10);
        assert!((breakdown[0].accuracy - 0.6).abs() < 1e-9);
        assert_eq!(breakdown[1].disciplina, "Português");
        assert!((breakdown[1].accuracy - 1.0).abs() < 1e-9);
    }
}
