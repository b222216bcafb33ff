use crate::audit::event::AuditEvent;
use crate::audit::log::AuditLog;
use crate::checklist::ChecklistRegistry;
use crate::determinism::json_canonical::fixed2;
use crate::determinism::run_id::{call_id, run_id_ulid, sha256_hex};
use crate::error::{CoreError, CoreResult};
use crate::oracle::OracleClient;
use crate::scoring::SectionResult;
use futures::stream::{self, StreamExt};
use serde_json::json;
use std::time::Duration;
use tracing::Instrument;

use super::aggregate::{aggregate, FailureKind, RunReport, SectionFailure};
use super::retry::RetryPolicy;
use super::section::{evaluate_section, SectionOutcome};

#[derive(Debug, Clone)]
pub struct RunInput {
    policy_text: String,
    chapter_text: String,
}

impl RunInput {
    pub fn new(policy_text: impl Into<String>, chapter_text: impl Into<String>) -> CoreResult<Self> {
        let policy_text = policy_text.into();
        let chapter_text = chapter_text.into();
        if policy_text.trim().is_empty() {
            return Err(CoreError::InvalidInput("policy text is empty".to_string()));
        }
        if chapter_text.trim().is_empty() {
            return Err(CoreError::InvalidInput("chapter text is empty".to_string()));
        }
        Ok(Self {
            policy_text,
            chapter_text,
        })
    }

    pub fn policy_text(&self) -> &str {
        &self.policy_text
    }

    pub fn chapter_text(&self) -> &str {
        &self.chapter_text
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Sections evaluated concurrently; 1 means strictly sequential.
    pub max_in_flight: usize,
    pub retry: RetryPolicy,
    pub section_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 1,
            retry: RetryPolicy::default(),
            section_timeout: None,
        }
    }
}

pub struct ComplianceRunner<O> {
    registry: ChecklistRegistry,
    oracle: O,
    options: RunOptions,
}

impl<O: OracleClient> ComplianceRunner<O> {
    pub fn new(registry: ChecklistRegistry, oracle: O, options: RunOptions) -> Self {
        Self {
            registry,
            oracle,
            options,
        }
    }

    pub fn registry(&self) -> &ChecklistRegistry {
        &self.registry
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Evaluates every registry section. Results come back in registry order
    /// whatever order the oracle calls complete in.
    pub async fn evaluate_sections(&self, input: &RunInput) -> Vec<SectionOutcome> {
        let max_in_flight = self.options.max_in_flight.max(1);
        stream::iter(self.registry.sections().iter().map(|checklist| {
            evaluate_section(&self.oracle, checklist, input, &self.options).instrument(
                tracing::info_span!("section", section = %checklist.section_id),
            )
        }))
        .buffered(max_in_flight)
        .collect()
        .await
    }

    pub async fn run(&self, input: &RunInput) -> RunReport {
        let run_id = run_id_ulid();
        let outcomes = self.evaluate_sections(input).await;
        self.fold(&run_id, outcomes)
    }

    /// Same as [`run`](Self::run) with every oracle call and score appended to `audit`.
    pub async fn run_audited(&self, input: &RunInput, audit: &mut AuditLog) -> CoreResult<RunReport> {
        let run_id = run_id_ulid();
        audit.append(AuditEvent::system(
            &run_id,
            "RUN_STARTED",
            json!({
                "model_id": self.oracle.model_id(),
                "sections_expected": self.registry.len(),
                "policy_sha256": sha256_hex(input.policy_text().as_bytes()),
                "chapter_sha256": sha256_hex(input.chapter_text().as_bytes()),
            }),
        )?)?;

        let outcomes = self.evaluate_sections(input).await;
        for outcome in &outcomes {
            append_section_events(audit, &run_id, outcome)?;
        }
        let report = self.fold(&run_id, outcomes);

        audit.append(AuditEvent::system(
            &run_id,
            "RUN_COMPLETED",
            json!({
                "sections_expected": report.expected_section_count(),
                "sections_scored": report.sections().len(),
                "sections_failed": report.failures().len(),
                "overall_score_percent": fixed2(report.overall_score_percent()),
            }),
        )?)?;
        Ok(report)
    }

    fn fold(&self, run_id: &str, outcomes: Vec<SectionOutcome>) -> RunReport {
        let mut results: Vec<SectionResult> = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(result) => {
                    tracing::info!(
                        section = %result.section_id(),
                        match_level = result.match_level().as_str(),
                        severity = result.severity().as_str(),
                        points = result.compliance_points(),
                        attempts = outcome.attempts,
                        "section scored"
                    );
                    results.push(result);
                }
                Err(err) => {
                    tracing::error!(
                        section = %outcome.section_id,
                        kind = FailureKind::of(&err).as_str(),
                        attempts = outcome.attempts,
                        error = %err,
                        "section evaluation failed"
                    );
                    failures.push(SectionFailure {
                        section_id: outcome.section_id,
                        kind: FailureKind::of(&err),
                        message: err.to_string(),
                        attempts: outcome.attempts,
                    });
                }
            }
        }

        let report = aggregate(results, self.registry.len())
            .with_failures(failures)
            .with_run_id(run_id);
        tracing::info!(
            run_id,
            sections_scored = report.sections().len(),
            sections_failed = report.failures().len(),
            overall_score_percent = report.overall_score_percent(),
            "run completed"
        );
        report
    }
}

fn append_section_events(audit: &mut AuditLog, run_id: &str, outcome: &SectionOutcome) -> CoreResult<()> {
    let call = call_id(run_id, outcome.section_id.number());
    let section = outcome.section_id.to_string();
    match (&outcome.result, &outcome.response_sha256) {
        (Err(err), _) => {
            audit.append(AuditEvent::system(
                run_id,
                "MODEL_CALL_FAILED",
                json!({
                    "call_id": call,
                    "section_id": section,
                    "error_kind": FailureKind::of(err).as_str(),
                    "error_message": err.to_string(),
                    "attempts": outcome.attempts,
                    "request_hash_sha256": outcome.request_sha256,
                }),
            )?)?;
        }
        (Ok(result), response_sha256) => {
            audit.append(AuditEvent::system(
                run_id,
                "MODEL_CALL_COMPLETED",
                json!({
                    "call_id": call,
                    "section_id": section,
                    "request_hash_sha256": outcome.request_sha256,
                    "response_hash_sha256": response_sha256.clone().unwrap_or_default(),
                    "duration_ms": outcome.duration_ms,
                    "attempts": outcome.attempts,
                }),
            )?)?;
            audit.append(AuditEvent::system(
                run_id,
                "SECTION_SCORED",
                json!({
                    "section_id": section,
                    "match_level": result.match_level().as_str(),
                    "severity": result.severity().as_str(),
                    "compliance_points": fixed2(result.compliance_points()),
                    "unmatched_items": result.unmatched_count(),
                }),
            )?)?;
        }
    }
    Ok(())
}
