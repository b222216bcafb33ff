mod common;

use common::{
    all_matched, fast_options, input, oracle_json, partially_matched, Script, ScriptedOracle,
};
use dpdpa_core::audit::event::AuditEvent;
use dpdpa_core::audit::log::{verify_chain, AuditLog};
use dpdpa_core::checklist::{ChecklistRegistry, SectionId};
use dpdpa_core::error::{CoreError, OracleFailureCategory};
use dpdpa_core::export::format_score_percent;
use dpdpa_core::run::{ComplianceRunner, FailureKind, RetryPolicy, RunInput, RunOptions};
use dpdpa_core::scoring::{MatchLevel, Severity};
use std::sync::Arc;
use std::time::Duration;

fn runner(oracle: &Arc<ScriptedOracle>, options: RunOptions) -> ComplianceRunner<Arc<ScriptedOracle>> {
    ComplianceRunner::new(ChecklistRegistry::builtin(), Arc::clone(oracle), options)
}

#[tokio::test]
async fn consent_section_with_two_gaps_scores_medium() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section6,
        Script::Reply(oracle_json(
            SectionId::Section6,
            &[true, true, false, true, true, false, true, true],
        )),
    );

    let report = runner(&oracle, fast_options(1)).run(&input()).await;
    let s6 = report.section(SectionId::Section6).unwrap();
    assert_eq!(s6.match_level(), MatchLevel::PartiallyCompliant);
    assert_eq!(s6.severity(), Severity::Medium);
    assert_eq!(s6.compliance_points(), 0.5);
    assert_eq!(s6.unmatched_count(), 2);
    // one remediation sentence per unmatched item, carried through verbatim
    assert_eq!(
        s6.suggested_rewrite(),
        "We will address missing obligation 1. We will address missing obligation 2."
    );

    assert_eq!(report.sections().len(), 7);
    assert!(report.failures().is_empty());
    assert_eq!(format_score_percent(report.overall_score_percent()), "92.86%");
    assert!(report.run_id().unwrap().starts_with("r_"));
}

#[tokio::test]
async fn failed_section_is_absent_but_counted() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section7,
        Script::Fail(OracleFailureCategory::Rejected),
    );

    let report = runner(&oracle, fast_options(1)).run(&input()).await;
    assert_eq!(report.sections().len(), 6);
    assert!(report.section(SectionId::Section7).is_none());
    assert_eq!(report.expected_section_count(), 7);
    assert_eq!(format_score_percent(report.overall_score_percent()), "85.71%");

    let failure = &report.failures()[0];
    assert_eq!(failure.section_id, SectionId::Section7);
    assert_eq!(failure.kind, FailureKind::OracleTransportFailure);
    assert_eq!(failure.attempts, 1);
    assert_eq!(oracle.calls(SectionId::Section7), 1);
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section5,
        Script::Fail(OracleFailureCategory::RateLimited),
    );
    oracle.push(SectionId::Section5, Script::Reply(all_matched(SectionId::Section5)));

    let report = runner(&oracle, fast_options(1)).run(&input()).await;
    assert_eq!(report.sections().len(), 7);
    assert_eq!(oracle.calls(SectionId::Section5), 2);
    assert_eq!(oracle.calls(SectionId::Section4), 1);
}

#[tokio::test]
async fn invalid_records_fail_without_retry() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section9,
        Script::Reply("Here is my assessment: mostly fine.".to_string()),
    );

    let report = runner(&oracle, fast_options(1)).run(&input()).await;
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].kind, FailureKind::OracleResponseInvalid);
    assert_eq!(oracle.calls(SectionId::Section9), 1);
}

#[tokio::test]
async fn slow_sections_time_out() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section4,
        Script::DelayedReply(Duration::from_secs(5), all_matched(SectionId::Section4)),
    );
    let options = RunOptions {
        max_in_flight: 1,
        retry: RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
        },
        section_timeout: Some(Duration::from_millis(20)),
    };

    let report = runner(&oracle, options).run(&input()).await;
    let failure = &report.failures()[0];
    assert_eq!(failure.section_id, SectionId::Section4);
    assert_eq!(failure.attempts, 2);
    assert!(failure.message.contains("TIMEOUT"));
    assert_eq!(report.sections().len(), 6);
}

fn staggered_oracle() -> Arc<ScriptedOracle> {
    let oracle = ScriptedOracle::new();
    for (idx, section) in SectionId::ALL.iter().enumerate() {
        // Later sections answer first.
        let delay = Duration::from_millis(5 * (7 - idx as u64));
        oracle.push(
            *section,
            Script::DelayedReply(delay, partially_matched(*section, idx % 3)),
        );
    }
    Arc::new(oracle)
}

#[tokio::test]
async fn parallel_run_matches_sequential_run() {
    let sequential_oracle = staggered_oracle();
    let sequential = runner(&sequential_oracle, fast_options(1)).run(&input()).await;
    assert_eq!(sequential_oracle.peak_in_flight(), 1);

    let parallel_oracle = staggered_oracle();
    let parallel = runner(&parallel_oracle, fast_options(4)).run(&input()).await;
    assert!(parallel_oracle.peak_in_flight() > 1);
    assert!(parallel_oracle.peak_in_flight() <= 4);

    assert_eq!(sequential.sections(), parallel.sections());
    assert_eq!(sequential.overall_score_percent(), parallel.overall_score_percent());
    let order: Vec<SectionId> = parallel.sections().iter().map(|s| s.section_id()).collect();
    assert_eq!(order, SectionId::ALL.to_vec());
}

#[tokio::test]
async fn sequential_run_calls_each_section_once_in_order() {
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    runner(&oracle, fast_options(1)).run(&input()).await;
    let requests = oracle.requests();
    let order: Vec<SectionId> = requests.iter().map(|r| r.section_id).collect();
    assert_eq!(order, SectionId::ALL.to_vec());
    assert!(requests.iter().all(|r| r.temperature == 0.0));
    assert_eq!(oracle.total_calls(), 7);
}

#[tokio::test]
async fn audited_run_writes_a_verifiable_chain() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("audit").join("run.ndjson");
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    oracle.set(
        SectionId::Section7,
        Script::Fail(OracleFailureCategory::Rejected),
    );

    let mut audit = AuditLog::open_or_create(&log_path).unwrap();
    let report = runner(&oracle, fast_options(2))
        .run_audited(&input(), &mut audit)
        .await
        .unwrap();

    // start + 6 x (call completed, section scored) + 1 call failed + completed
    assert_eq!(verify_chain(&log_path).unwrap(), 15);

    let events: Vec<AuditEvent> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.first().unwrap().event_type, "RUN_STARTED");
    assert_eq!(events.first().unwrap().details["model_id"], "scripted-model");
    let last = events.last().unwrap();
    assert_eq!(last.event_type, "RUN_COMPLETED");
    assert_eq!(last.details["sections_failed"], 1);
    assert_eq!(last.details["overall_score_percent"], "85.71");
    assert!(events
        .iter()
        .all(|e| Some(e.run_id.as_str()) == report.run_id()));

    let failed: Vec<&AuditEvent> = events
        .iter()
        .filter(|e| e.event_type == "MODEL_CALL_FAILED")
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].details["section_id"], "Section 7");
    assert_eq!(failed[0].details["error_kind"], "ORACLE_TRANSPORT_FAILURE");
}

#[tokio::test]
async fn audit_log_reopens_and_keeps_chaining() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.ndjson");
    let oracle = Arc::new(ScriptedOracle::all_compliant());
    let runner = runner(&oracle, fast_options(1));

    let mut audit = AuditLog::open_or_create(&log_path).unwrap();
    runner.run_audited(&input(), &mut audit).await.unwrap();
    let mut reopened = AuditLog::open_or_create(&log_path).unwrap();
    assert_eq!(reopened.last_hash(), audit.last_hash());
    runner.run_audited(&input(), &mut reopened).await.unwrap();

    assert_eq!(verify_chain(&log_path).unwrap(), 2 * (2 + 7 * 2));
}

#[test]
fn blank_inputs_are_rejected() {
    assert!(matches!(
        RunInput::new("   ", "chapter"),
        Err(CoreError::InvalidInput(_))
    ));
    assert!(matches!(
        RunInput::new("policy", "\n"),
        Err(CoreError::InvalidInput(_))
    ));
}
