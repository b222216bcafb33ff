use crate::determinism::json_canonical;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts_utc: String, // RFC3339 UTC string
    pub event_type: String,
    pub run_id: String,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub prev_event_hash: String, // hex 64
    pub event_hash: String,      // hex 64
}

impl AuditEvent {
    pub fn system(run_id: &str, event_type: &str, details: serde_json::Value) -> CoreResult<Self> {
        Ok(Self {
            ts_utc: now_rfc3339_utc()?,
            event_type: event_type.to_string(),
            run_id: run_id.to_string(),
            actor: Actor::System,
            details,
            prev_event_hash: String::new(),
            event_hash: String::new(),
        })
    }
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// event_hash = SHA-256 over the canonical bytes of the whole event with event_hash zeroed.
pub fn compute_event_hash(event: &AuditEvent) -> CoreResult<String> {
    let mut e = event.clone();
    e.event_hash = ZERO_HASH_64.to_string();
    let bytes = json_canonical::to_canonical_bytes(&e)?;
    let mut h = Sha256::new();
    h.update(bytes);
    Ok(hex::encode(h.finalize()))
}

pub fn finalize_event(mut event: AuditEvent) -> CoreResult<AuditEvent> {
    if event.prev_event_hash.len() != 64
        || !event.prev_event_hash.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(CoreError::InvalidInput(
            "prev_event_hash must be 64 hex chars".to_string(),
        ));
    }
    validate_event_taxonomy(&event)?;
    event.event_hash = compute_event_hash(&event)?;
    Ok(event)
}

fn validate_event_taxonomy(event: &AuditEvent) -> CoreResult<()> {
    let allowed = [
        "RUN_STARTED",
        "MODEL_CALL_COMPLETED",
        "MODEL_CALL_FAILED",
        "SECTION_SCORED",
        "RUN_COMPLETED",
    ];
    if !allowed.contains(&event.event_type.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "unknown event_type {}",
            event.event_type
        )));
    }
    for k in required_detail_keys(&event.event_type) {
        if event.details.get(k).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "event {} missing details.{}",
                event.event_type, k
            )));
        }
    }
    Ok(())
}

fn required_detail_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "RUN_STARTED" => &[
            "model_id",
            "sections_expected",
            "policy_sha256",
            "chapter_sha256",
        ],
        "MODEL_CALL_COMPLETED" => &[
            "call_id",
            "section_id",
            "request_hash_sha256",
            "response_hash_sha256",
            "duration_ms",
            "attempts",
        ],
        "MODEL_CALL_FAILED" => &[
            "call_id",
            "section_id",
            "error_kind",
            "error_message",
            "attempts",
        ],
        "SECTION_SCORED" => &[
            "section_id",
            "match_level",
            "severity",
            "compliance_points",
            "unmatched_items",
        ],
        "RUN_COMPLETED" => &[
            "sections_expected",
            "sections_scored",
            "sections_failed",
            "overall_score_percent",
        ],
        _ => &[],
    }
}

pub fn now_rfc3339_utc() -> CoreResult<String> {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| CoreError::InvalidInput(format!("timestamp format: {}", e)))
}
