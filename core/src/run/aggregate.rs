use crate::checklist::SectionId;
use crate::error::CoreError;
use crate::scoring::SectionResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    UnknownSection,
    OracleTransportFailure,
    OracleResponseInvalid,
    Other,
}

impl FailureKind {
    pub fn of(err: &CoreError) -> Self {
        match err {
            CoreError::UnknownSection(_) => FailureKind::UnknownSection,
            CoreError::OracleTransportFailure { .. } => FailureKind::OracleTransportFailure,
            CoreError::OracleResponseInvalid { .. } => FailureKind::OracleResponseInvalid,
            _ => FailureKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::UnknownSection => "UNKNOWN_SECTION",
            FailureKind::OracleTransportFailure => "ORACLE_TRANSPORT_FAILURE",
            FailureKind::OracleResponseInvalid => "ORACLE_RESPONSE_INVALID",
            FailureKind::Other => "OTHER",
        }
    }
}

/// A section that produced no result in this run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SectionFailure {
    pub section_id: SectionId,
    pub kind: FailureKind,
    pub message: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<String>,
    sections: Vec<SectionResult>,
    failures: Vec<SectionFailure>,
    expected_section_count: usize,
    overall_score_percent: f64,
}

impl RunReport {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_failures(mut self, mut failures: Vec<SectionFailure>) -> Self {
        failures.sort_by_key(|f| f.section_id);
        self.failures = failures;
        self
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    pub fn sections(&self) -> &[SectionResult] {
        &self.sections
    }

    pub fn section(&self, section_id: SectionId) -> Option<&SectionResult> {
        self.sections.iter().find(|s| s.section_id() == section_id)
    }

    pub fn failures(&self) -> &[SectionFailure] {
        &self.failures
    }

    pub fn expected_section_count(&self) -> usize {
        self.expected_section_count
    }

    pub fn overall_score_percent(&self) -> f64 {
        self.overall_score_percent
    }

    pub fn total_points(&self) -> f64 {
        self.sections.iter().map(|s| s.compliance_points()).sum()
    }
}

/// Folds scored sections into a report. Sections missing from `section_results`
/// still count in the denominator, so failed evaluations score zero.
pub fn aggregate(mut section_results: Vec<SectionResult>, expected_section_count: usize) -> RunReport {
    section_results.sort_by_key(|s| s.section_id());
    let total: f64 = section_results.iter().map(|s| s.compliance_points()).sum();
    let overall_score_percent = if expected_section_count == 0 {
        0.0
    } else {
        total / expected_section_count as f64 * 100.0
    };
    RunReport {
        run_id: None,
        sections: section_results,
        failures: Vec::new(),
        expected_section_count,
        overall_score_percent,
    }
}
