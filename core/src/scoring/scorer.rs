use crate::checklist::SectionChecklist;
use crate::oracle::response::OracleVerdict;

use super::model::{ChecklistItemVerdict, MatchLevel, SectionResult, Severity};

pub const FULL_POINTS: f64 = 1.0;
pub const MINOR_POINTS: f64 = 0.75;
pub const MEDIUM_POINTS: f64 = 0.5;
pub const MAJOR_POINTS: f64 = 0.25;
pub const NON_COMPLIANT_POINTS: f64 = 0.0;

/// Points table keyed by classification.
///
/// `classify` never yields `(PartiallyCompliant, None)`; if a caller passes it
/// anyway it is scored as Major, the lowest partial grade.
pub fn compliance_points(match_level: MatchLevel, severity: Severity) -> f64 {
    match (match_level, severity) {
        (MatchLevel::FullyCompliant, _) => FULL_POINTS,
        (MatchLevel::NonCompliant, _) => NON_COMPLIANT_POINTS,
        (MatchLevel::PartiallyCompliant, Severity::Minor) => MINOR_POINTS,
        (MatchLevel::PartiallyCompliant, Severity::Medium) => MEDIUM_POINTS,
        (MatchLevel::PartiallyCompliant, Severity::Major | Severity::None) => MAJOR_POINTS,
    }
}

pub fn severity_for_unmatched(unmatched_count: usize) -> Severity {
    match unmatched_count {
        0 => Severity::None,
        1 => Severity::Minor,
        2 | 3 => Severity::Medium,
        _ => Severity::Major,
    }
}

/// Derives (match level, severity) from the per-item verdicts. The oracle's own
/// classification is never consulted.
///
/// An empty checklist is vacuously satisfied and scores as fully compliant.
pub fn classify(
    verdicts: &[ChecklistItemVerdict],
    checklist: &SectionChecklist,
) -> (MatchLevel, Severity) {
    let total_count = verdicts.len();
    let unmatched: Vec<usize> = verdicts
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.matched)
        .map(|(idx, _)| idx)
        .collect();

    if unmatched.is_empty() {
        return (MatchLevel::FullyCompliant, Severity::None);
    }
    if unmatched.len() == total_count {
        return (MatchLevel::NonCompliant, Severity::None);
    }

    let critical_missing = unmatched.iter().any(|idx| {
        checklist
            .items
            .get(*idx)
            .map(|item| item.critical)
            .unwrap_or(false)
    });
    let severity = if critical_missing {
        Severity::Major
    } else {
        severity_for_unmatched(unmatched.len())
    };
    (MatchLevel::PartiallyCompliant, severity)
}

pub fn score_section(verdict: &OracleVerdict, checklist: &SectionChecklist) -> SectionResult {
    let (match_level, severity) = classify(&verdict.item_verdicts, checklist);
    let suggested_rewrite = if match_level == MatchLevel::FullyCompliant {
        String::new()
    } else {
        verdict.suggested_rewrite.clone()
    };
    SectionResult::new(
        verdict.section_id,
        verdict.section_meaning.clone(),
        verdict.item_verdicts.clone(),
        match_level,
        severity,
        compliance_points(match_level, severity),
        suggested_rewrite,
    )
}
