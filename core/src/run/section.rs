use crate::checklist::{SectionChecklist, SectionId};
use crate::determinism::run_id::sha256_hex;
use crate::error::{CoreError, CoreResult, OracleFailureCategory};
use crate::oracle::{build_evaluation_request, parse_oracle_record, EvaluationRequest, OracleClient};
use crate::scoring::{score_section, SectionResult};
use std::time::{Duration, Instant};

use super::manager::{RunInput, RunOptions};
use super::retry::with_retry;

/// Everything one section evaluation produced, kept for the audit trail.
#[derive(Debug)]
pub struct SectionOutcome {
    pub section_id: SectionId,
    pub attempts: u32,
    pub duration_ms: u64,
    pub request_sha256: String,
    pub response_sha256: Option<String>,
    pub result: CoreResult<SectionResult>,
}

pub async fn evaluate_section<O: OracleClient + ?Sized>(
    oracle: &O,
    checklist: &SectionChecklist,
    input: &RunInput,
    options: &RunOptions,
) -> SectionOutcome {
    let started = Instant::now();
    let request = build_evaluation_request(checklist, input.policy_text(), input.chapter_text());
    let request_sha256 = sha256_hex(request.prompt.as_bytes());

    let (raw, attempts) = with_retry(&options.retry, || {
        call_oracle(oracle, &request, options.section_timeout)
    })
    .await;
    let response_sha256 = raw.as_ref().ok().map(|r| sha256_hex(r.as_bytes()));
    let result = raw
        .and_then(|raw| parse_oracle_record(&raw, checklist))
        .map(|verdict| score_section(&verdict, checklist));

    SectionOutcome {
        section_id: checklist.section_id,
        attempts,
        duration_ms: started.elapsed().as_millis() as u64,
        request_sha256,
        response_sha256,
        result,
    }
}

async fn call_oracle<O: OracleClient + ?Sized>(
    oracle: &O,
    request: &EvaluationRequest,
    timeout: Option<Duration>,
) -> CoreResult<String> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, oracle.complete(request))
            .await
            .map_err(|_| {
                CoreError::transport(
                    OracleFailureCategory::Timeout,
                    format!("no oracle response within {} ms", limit.as_millis()),
                )
            })?,
        None => oracle.complete(request).await,
    }
}
