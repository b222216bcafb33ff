use crate::checklist::SectionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MatchLevel {
    #[serde(rename = "Fully Compliant")]
    FullyCompliant,
    #[serde(rename = "Partially Compliant")]
    PartiallyCompliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl MatchLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchLevel::FullyCompliant => "Fully Compliant",
            MatchLevel::PartiallyCompliant => "Partially Compliant",
            MatchLevel::NonCompliant => "Non-Compliant",
        }
    }

    pub fn from_label(label: &str) -> Option<MatchLevel> {
        match label {
            "Fully Compliant" => Some(MatchLevel::FullyCompliant),
            "Partially Compliant" => Some(MatchLevel::PartiallyCompliant),
            "Non-Compliant" => Some(MatchLevel::NonCompliant),
            _ => None,
        }
    }
}

/// Shortfall grade; anything other than `None` only occurs for partial compliance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    None,
    Minor,
    Medium,
    Major,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Minor => "Minor",
            Severity::Medium => "Medium",
            Severity::Major => "Major",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItemVerdict {
    pub item: String,
    pub matched: bool,
    pub matched_sentences: Vec<String>,
    pub justification: String,
}

/// Finalized verdict for one section. Only the scorer builds these, so the
/// classification fields always agree with `item_verdicts`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionResult {
    section_id: SectionId,
    section_meaning: String,
    item_verdicts: Vec<ChecklistItemVerdict>,
    match_level: MatchLevel,
    severity: Severity,
    compliance_points: f64,
    suggested_rewrite: String,
}

impl SectionResult {
    pub(crate) fn new(
        section_id: SectionId,
        section_meaning: String,
        item_verdicts: Vec<ChecklistItemVerdict>,
        match_level: MatchLevel,
        severity: Severity,
        compliance_points: f64,
        suggested_rewrite: String,
    ) -> Self {
        Self {
            section_id,
            section_meaning,
            item_verdicts,
            match_level,
            severity,
            compliance_points,
            suggested_rewrite,
        }
    }

    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    pub fn section_meaning(&self) -> &str {
        &self.section_meaning
    }

    pub fn item_verdicts(&self) -> &[ChecklistItemVerdict] {
        &self.item_verdicts
    }

    pub fn match_level(&self) -> MatchLevel {
        self.match_level
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn compliance_points(&self) -> f64 {
        self.compliance_points
    }

    pub fn suggested_rewrite(&self) -> &str {
        &self.suggested_rewrite
    }

    pub fn unmatched_items(&self) -> impl Iterator<Item = &ChecklistItemVerdict> {
        self.item_verdicts.iter().filter(|v| !v.matched)
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched_items().count()
    }
}
