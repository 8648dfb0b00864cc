//! DASS-21 scoring: raw sums doubled, mapped through fixed severity cutoffs.
//!
//! Pure arithmetic; the same answer set always produces the same report.

use crate::assessment::{AnswerSet, Category, QUESTIONS};
use serde::{Deserialize, Serialize};

/// Five-point ordinal severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
    ExtremelySevere,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::ExtremelySevere => "Extremely Severe",
        }
    }

    /// Fixed one-line explanation shown with the severity.
    pub fn explanation(&self) -> &'static str {
        match self {
            Severity::Normal => "Within the normal range.",
            Severity::Mild => "Slightly elevated symptoms.",
            Severity::Moderate => "Noticeable symptoms affecting you.",
            Severity::Severe => "Significant impact on your daily life.",
            Severity::ExtremelySevere => "Critical level of distress.",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity for a doubled category score. Boundary values resolve to the
/// lower-severity bucket (e.g. depression 9 is still Normal).
pub fn severity_for(category: Category, score: u16) -> Severity {
    let cutoffs: [u16; 4] = match category {
        Category::Depression => [9, 13, 20, 27],
        Category::Anxiety => [7, 9, 14, 19],
        Category::Stress => [14, 18, 25, 33],
    };
    if score <= cutoffs[0] {
        Severity::Normal
    } else if score <= cutoffs[1] {
        Severity::Mild
    } else if score <= cutoffs[2] {
        Severity::Moderate
    } else if score <= cutoffs[3] {
        Severity::Severe
    } else {
        Severity::ExtremelySevere
    }
}

/// One subscale outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u16,
    pub level: Severity,
}

/// Full scoring result for one completed questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub depression: CategoryScore,
    pub anxiety: CategoryScore,
    pub stress: CategoryScore,
    pub total: u16,
}

impl ScoreReport {
    /// Levels in the fixed (depression, anxiety, stress) order.
    pub fn levels(&self) -> [Severity; 3] {
        [self.depression.level, self.anxiety.level, self.stress.level]
    }

    /// Overall status label. Scanning in (depression, anxiety, stress)
    /// order: the first level at Severe or above wins and contributes its
    /// own label, so "Extremely Severe" and "Severe" are equal top priority.
    /// Otherwise "Moderate" if any category is Moderate; otherwise
    /// "Healthy" (Mild alone still reads as Healthy).
    pub fn overall_label(&self) -> String {
        let levels = self.levels();
        if let Some(l) = levels.iter().find(|l| **l >= Severity::Severe) {
            return l.label().to_string();
        }
        if levels.iter().any(|l| *l == Severity::Moderate) {
            return "Moderate".to_string();
        }
        "Healthy".to_string()
    }
}

/// Score a completed (or partial) answer set. Each category score is twice
/// the sum of that category's raw answers; unanswered questions count as 0.
pub fn score_answers(answers: &AnswerSet) -> ScoreReport {
    let mut raw_depression: u16 = 0;
    let mut raw_anxiety: u16 = 0;
    let mut raw_stress: u16 = 0;

    for q in &QUESTIONS {
        let val = answers.get(q.id) as u16;
        match q.category {
            Category::Depression => raw_depression += val,
            Category::Anxiety => raw_anxiety += val,
            Category::Stress => raw_stress += val,
        }
    }

    let depression = raw_depression * 2;
    let anxiety = raw_anxiety * 2;
    let stress = raw_stress * 2;

    ScoreReport {
        depression: CategoryScore {
            score: depression,
            level: severity_for(Category::Depression, depression),
        },
        anxiety: CategoryScore {
            score: anxiety,
            level: severity_for(Category::Anxiety, anxiety),
        },
        stress: CategoryScore {
            score: stress,
            level: severity_for(Category::Stress, stress),
        },
        total: depression + anxiety + stress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::QUESTIONS;

    fn answers_all(value: u8) -> AnswerSet {
        let mut set = AnswerSet::new();
        for q in &QUESTIONS {
            set.set(q.id, value).unwrap();
        }
        set
    }

    #[test]
    fn category_scores_are_doubled_sums() {
        let report = score_answers(&answers_all(1));
        // 7 questions per category, each answered 1, doubled.
        assert_eq!(report.depression.score, 14);
        assert_eq!(report.anxiety.score, 14);
        assert_eq!(report.stress.score, 14);
        assert_eq!(report.total, 42);
    }

    #[test]
    fn scores_are_always_even() {
        for value in 0..=3u8 {
            let report = score_answers(&answers_all(value));
            assert_eq!(report.depression.score % 2, 0);
            assert_eq!(report.anxiety.score % 2, 0);
            assert_eq!(report.stress.score % 2, 0);
        }
    }

    #[test]
    fn empty_answers_score_zero_and_normal() {
        let report = score_answers(&AnswerSet::new());
        assert_eq!(report.total, 0);
        assert_eq!(report.depression.level, Severity::Normal);
        assert_eq!(report.overall_label(), "Healthy");
    }

    #[test]
    fn cutoff_boundaries_resolve_to_lower_bucket() {
        use Category::*;
        // Depression: 9 is still Normal, 10 tips into Mild, and so on.
        assert_eq!(severity_for(Depression, 9), Severity::Normal);
        assert_eq!(severity_for(Depression, 10), Severity::Mild);
        assert_eq!(severity_for(Depression, 13), Severity::Mild);
        assert_eq!(severity_for(Depression, 14), Severity::Moderate);
        assert_eq!(severity_for(Depression, 20), Severity::Moderate);
        assert_eq!(severity_for(Depression, 21), Severity::Severe);
        assert_eq!(severity_for(Depression, 27), Severity::Severe);
        assert_eq!(severity_for(Depression, 28), Severity::ExtremelySevere);

        assert_eq!(severity_for(Anxiety, 7), Severity::Normal);
        assert_eq!(severity_for(Anxiety, 8), Severity::Mild);
        assert_eq!(severity_for(Anxiety, 9), Severity::Mild);
        assert_eq!(severity_for(Anxiety, 10), Severity::Moderate);
        assert_eq!(severity_for(Anxiety, 14), Severity::Moderate);
        assert_eq!(severity_for(Anxiety, 15), Severity::Severe);
        assert_eq!(severity_for(Anxiety, 19), Severity::Severe);
        assert_eq!(severity_for(Anxiety, 20), Severity::ExtremelySevere);

        assert_eq!(severity_for(Stress, 14), Severity::Normal);
        assert_eq!(severity_for(Stress, 15), Severity::Mild);
        assert_eq!(severity_for(Stress, 18), Severity::Mild);
        assert_eq!(severity_for(Stress, 19), Severity::Moderate);
        assert_eq!(severity_for(Stress, 25), Severity::Moderate);
        assert_eq!(severity_for(Stress, 26), Severity::Severe);
        assert_eq!(severity_for(Stress, 33), Severity::Severe);
        assert_eq!(severity_for(Stress, 34), Severity::ExtremelySevere);
    }

    fn report_with_levels(d: Severity, a: Severity, s: Severity) -> ScoreReport {
        ScoreReport {
            depression: CategoryScore { score: 0, level: d },
            anxiety: CategoryScore { score: 0, level: a },
            stress: CategoryScore { score: 0, level: s },
            total: 0,
        }
    }

    #[test]
    fn overall_label_prefers_severe_over_moderate() {
        let report = report_with_levels(Severity::Moderate, Severity::Normal, Severity::Severe);
        assert_eq!(report.overall_label(), "Severe");
    }

    #[test]
    fn overall_label_all_normal_is_healthy() {
        let report = report_with_levels(Severity::Normal, Severity::Normal, Severity::Normal);
        assert_eq!(report.overall_label(), "Healthy");
    }

    #[test]
    fn overall_label_mild_alone_is_healthy() {
        let report = report_with_levels(Severity::Mild, Severity::Normal, Severity::Normal);
        assert_eq!(report.overall_label(), "Healthy");
    }

    #[test]
    fn overall_label_extremely_severe_keeps_its_own_label() {
        let report =
            report_with_levels(Severity::ExtremelySevere, Severity::Severe, Severity::Normal);
        assert_eq!(report.overall_label(), "Extremely Severe");
    }

    #[test]
    fn overall_label_moderate_when_no_severe() {
        let report = report_with_levels(Severity::Mild, Severity::Moderate, Severity::Normal);
        assert_eq!(report.overall_label(), "Moderate");
    }
}
