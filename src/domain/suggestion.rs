// src/domain/suggestion.rs

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::progress::{
    self, MIN_ATTEMPTS, PRACTICE_FLOOR, WEAK_ACCURACY_CEILING,
};
use crate::models::{performance::PerformanceBucket, suggestion::ExamStatistic};

pub const TYPE_WEAK_AREA: &str = "weak_area";
pub const TYPE_HIGH_PRIORITY: &str = "high_priority";
pub const TYPE_RECOMMENDED: &str = "recommended";

/// Marker assunto for discipline-wide exam-statistics rows.
pub const GENERAL_SUBJECT: &str = "Geral";

/// One study suggestion, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySuggestion {
    pub disciplina: String,
    pub assunto: String,
    /// 'weak_area', 'high_priority' or 'recommended'.
    pub suggestion_type: String,
    /// Relative ordering weight; higher means study first.
    pub priority_score: i64,
    pub reason: String,
}

/// Composes study suggestions from the user's performance buckets and the
/// historical exam weights.
///
/// Three sources, in precedence order (one suggestion per subject):
/// 1. weak areas (enough attempts, accuracy below the ceiling), scored by
///    how far below the ceiling they sit plus the subject's exam weight;
/// 2. high-priority exam subjects the user has barely practiced;
/// 3. subjects with too few attempts to judge.
///
/// The result is sorted by priority_score descending, then by subject for
/// a deterministic order.
pub fn build_suggestions(
    buckets: &[PerformanceBucket],
    exam_stats: &[ExamStatistic],
) -> Vec<StudySuggestion> {
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut suggestions = Vec::new();

    for b in progress::weak_areas(buckets) {
        let gap = ((WEAK_ACCURACY_CEILING - b.accuracy()) * 100.0).round() as i64;
        let score = 50 + gap + exam_weight(exam_stats, &b.disciplina, &b.assunto);
        push_unique(
            &mut suggestions,
            &mut seen,
            StudySuggestion {
                disciplina: b.disciplina.clone(),
                assunto: b.assunto.clone(),
                suggestion_type: TYPE_WEAK_AREA.to_string(),
                priority_score: score,
                reason: format!(
                    "Aproveitamento de {:.0}% em {} questões, abaixo da meta de {:.0}%",
                    b.accuracy() * 100.0,
                    b.total_questions,
                    WEAK_ACCURACY_CEILING * 100.0
                ),
            },
        );
    }

    for stat in exam_stats.iter().filter(|s| s.priority_level == "alta") {
        let practiced = buckets.iter().any(|b| {
            b.disciplina == stat.disciplina
                && (stat.assunto == GENERAL_SUBJECT || b.assunto == stat.assunto)
                && b.total_questions >= MIN_ATTEMPTS
        });
        if practiced {
            continue;
        }
        push_unique(
            &mut suggestions,
            &mut seen,
            StudySuggestion {
                disciplina: stat.disciplina.clone(),
                assunto: stat.assunto.clone(),
                suggestion_type: TYPE_HIGH_PRIORITY.to_string(),
                priority_score: 40 + stat.percentage.round() as i64,
                reason: format!(
                    "{:.0}% das questões da prova de {} e pouca prática registrada",
                    stat.percentage, stat.exam_year
                ),
            },
        );
    }

    for b in progress::needs_practice(buckets) {
        push_unique(
            &mut suggestions,
            &mut seen,
            StudySuggestion {
                disciplina: b.disciplina.clone(),
                assunto: b.assunto.clone(),
                suggestion_type: TYPE_RECOMMENDED.to_string(),
                priority_score: 10 + (PRACTICE_FLOOR - b.total_questions),
                reason: format!(
                    "Apenas {} questões respondidas, amostra pequena para avaliar",
                    b.total_questions
                ),
            },
        );
    }

    suggestions.sort_by(|a, b| {
        b.priority_score
            .cmp(&a.priority_score)
            .then_with(|| a.disciplina.cmp(&b.disciplina))
            .then_with(|| a.assunto.cmp(&b.assunto))
    });
    suggestions
}

/// Exam weight for a subject: its own row wins over the discipline-wide
/// 'Geral' row; unknown subjects weigh nothing.
fn exam_weight(exam_stats: &[ExamStatistic], disciplina: &str, assunto: &str) -> i64 {
    exam_stats
        .iter()
        .filter(|s| s.disciplina == disciplina)
        .filter(|s| s.assunto == assunto || s.assunto == GENERAL_SUBJECT)
        .min_by_key(|s| s.assunto == GENERAL_SUBJECT)
        .map(|s| s.percentage.round() as i64)
        .unwrap_or(0)
}

fn push_unique(
    suggestions: &mut Vec<StudySuggestion>,
    seen: &mut BTreeSet<(String, String)>,
    suggestion: StudySuggestion,
) {
    if seen.insert((suggestion.disciplina.clone(), suggestion.assunto.clone())) {
        suggestions.push(suggestion);
    }
}
