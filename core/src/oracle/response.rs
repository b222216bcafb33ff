use crate::checklist::{SectionChecklist, SectionId};
use crate::error::{CoreError, CoreResult};
use crate::scoring::model::{ChecklistItemVerdict, MatchLevel};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "DPDPA Section")]
    section: String,
    #[serde(rename = "DPDPA Section Meaning")]
    section_meaning: String,
    #[serde(rename = "Checklist Items")]
    checklist_items: Vec<WireItem>,
    #[serde(rename = "Match Level")]
    match_level: String,
    #[serde(rename = "Severity")]
    severity: Value,
    #[serde(rename = "Compliance Points")]
    compliance_points: Value,
    #[serde(rename = "Suggested Rewrite")]
    suggested_rewrite: Value,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Matched")]
    matched: Value,
    #[serde(rename = "Matched Sentences")]
    matched_sentences: Vec<String>,
    #[serde(rename = "Justification")]
    justification: String,
}

/// An oracle record that passed structural validation for one section.
///
/// `reported_*` fields are what the oracle claimed; scoring ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleVerdict {
    pub section_id: SectionId,
    pub section_label: String,
    pub section_meaning: String,
    pub item_verdicts: Vec<ChecklistItemVerdict>,
    pub suggested_rewrite: String,
    pub reported_match_level: MatchLevel,
    pub reported_severity: Value,
    pub reported_compliance_points: Value,
}

pub fn parse_oracle_record(raw: &str, checklist: &SectionChecklist) -> CoreResult<OracleVerdict> {
    let section = checklist.section_id;
    let invalid = |reason: String| CoreError::invalid_response(section.to_string(), reason);

    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| invalid(format!("not JSON: {}", e)))?;
    if !value.is_object() {
        return Err(invalid("record must be a single JSON object".to_string()));
    }
    let wire: WireRecord =
        serde_json::from_value(value).map_err(|e| invalid(format!("record shape: {}", e)))?;

    if let Ok(echoed) = wire.section.parse::<SectionId>() {
        if echoed != section {
            return Err(invalid(format!("record describes {} instead", echoed)));
        }
    }
    if wire.section_meaning.trim().is_empty() {
        return Err(invalid("DPDPA Section Meaning is empty".to_string()));
    }
    if wire.checklist_items.len() != checklist.items.len() {
        return Err(invalid(format!(
            "expected {} checklist items, got {}",
            checklist.items.len(),
            wire.checklist_items.len()
        )));
    }
    let reported_match_level = MatchLevel::from_label(&wire.match_level)
        .ok_or_else(|| invalid(format!("unknown Match Level {:?}", wire.match_level)))?;

    let mut item_verdicts = Vec::with_capacity(wire.checklist_items.len());
    for (idx, (item, expected)) in wire
        .checklist_items
        .into_iter()
        .zip(checklist.items.iter())
        .enumerate()
    {
        let n = idx + 1;
        if item.item.trim() != expected.text.trim() {
            tracing::debug!(
                section = %section,
                item = n,
                echoed = %item.item,
                "oracle echoed different item text; keeping checklist text"
            );
        }
        let matched = item
            .matched
            .as_bool()
            .ok_or_else(|| invalid(format!("item {}: Matched must be a boolean", n)))?;
        if item.justification.trim().is_empty() {
            return Err(invalid(format!("item {}: Justification is empty", n)));
        }
        if matched && item.matched_sentences.is_empty() {
            return Err(invalid(format!(
                "item {}: matched without any Matched Sentences",
                n
            )));
        }
        if !matched && !item.matched_sentences.is_empty() {
            return Err(invalid(format!(
                "item {}: unmatched but lists Matched Sentences",
                n
            )));
        }
        item_verdicts.push(ChecklistItemVerdict {
            item: expected.text.clone(),
            matched,
            matched_sentences: item.matched_sentences,
            justification: item.justification,
        });
    }

    let suggested_rewrite = match wire.suggested_rewrite {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => {
            return Err(invalid(format!(
                "Suggested Rewrite must be a string, got {}",
                json_kind(&other)
            )))
        }
    };
    if item_verdicts.iter().any(|v| !v.matched) && suggested_rewrite.trim().is_empty() {
        return Err(invalid(
            "Suggested Rewrite is empty although checklist items are unmatched".to_string(),
        ));
    }

    Ok(OracleVerdict {
        section_id: section,
        section_label: wire.section,
        section_meaning: wire.section_meaning,
        item_verdicts,
        suggested_rewrite,
        reported_match_level,
        reported_severity: wire.severity,
        reported_compliance_points: wire.compliance_points,
    })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
