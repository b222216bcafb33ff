mod common;

use common::{all_matched, none_matched, partially_matched};
use dpdpa_core::checklist::{ChecklistRegistry, SectionId};
use dpdpa_core::export::format_score_percent;
use dpdpa_core::oracle::parse_oracle_record;
use dpdpa_core::run::aggregate;
use dpdpa_core::scoring::{score_section, SectionResult};

fn scored(section: SectionId, raw: &str) -> SectionResult {
    let reg = ChecklistRegistry::builtin();
    let checklist = reg.section(section).unwrap();
    score_section(&parse_oracle_record(raw, checklist).unwrap(), checklist)
}

#[test]
fn missing_sections_count_in_the_denominator() {
    let results = vec![
        scored(SectionId::Section4, &all_matched(SectionId::Section4)),
        scored(SectionId::Section6, &partially_matched(SectionId::Section6, 2)),
        scored(SectionId::Section8, &none_matched(SectionId::Section8)),
    ];
    let report = aggregate(results, 7);
    assert!((report.overall_score_percent() - 21.428_571).abs() < 1e-4);
    assert_eq!(format_score_percent(report.overall_score_percent()), "21.43%");
    assert_eq!(report.total_points(), 1.5);
    assert_eq!(report.expected_section_count(), 7);
}

#[test]
fn every_section_fully_compliant_scores_100() {
    let results = SectionId::ALL
        .iter()
        .map(|s| scored(*s, &all_matched(*s)))
        .collect();
    let report = aggregate(results, 7);
    assert_eq!(format_score_percent(report.overall_score_percent()), "100.00%");
}

#[test]
fn empty_run_scores_zero() {
    assert_eq!(aggregate(Vec::new(), 7).overall_score_percent(), 0.0);
    assert_eq!(aggregate(Vec::new(), 0).overall_score_percent(), 0.0);
}

#[test]
fn sections_come_back_in_registry_order() {
    let results = vec![
        scored(SectionId::Section10, &all_matched(SectionId::Section10)),
        scored(SectionId::Section5, &all_matched(SectionId::Section5)),
        scored(SectionId::Section7, &none_matched(SectionId::Section7)),
    ];
    let report = aggregate(results, 7);
    let order: Vec<SectionId> = report.sections().iter().map(|s| s.section_id()).collect();
    assert_eq!(
        order,
        vec![SectionId::Section5, SectionId::Section7, SectionId::Section10]
    );
    assert!(report.section(SectionId::Section7).is_some());
    assert!(report.section(SectionId::Section4).is_none());
}

#[test]
fn score_stays_within_bounds() {
    for unmatched in 0..=3 {
        let report = aggregate(
            vec![scored(
                SectionId::Section9,
                &partially_matched(SectionId::Section9, unmatched),
            )],
            7,
        );
        let pct = report.overall_score_percent();
        assert!((0.0..=100.0).contains(&pct), "{pct}");
    }
}
