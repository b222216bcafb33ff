use crate::error::CoreResult;
use crate::run::RunReport;
use std::fs;
use std::path::{Path, PathBuf};

use super::render::{render_missing_items_markdown, render_report_markdown, render_sectionwise_csv};

pub const SECTIONWISE_CSV: &str = "dpdpa_compliance_sectionwise.csv";
pub const REPORT_MARKDOWN: &str = "dpdpa_compliance_report.md";
pub const MISSING_ITEMS_MARKDOWN: &str = "missing_checklist_items.md";
pub const REPORT_JSON: &str = "dpdpa_compliance_report.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliverable {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Deliverable {
    fn new(file_name: &str, bytes: Vec<u8>, content_type: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            bytes,
            content_type: content_type.to_string(),
        }
    }
}

pub fn report_deliverables(report: &RunReport) -> CoreResult<Vec<Deliverable>> {
    Ok(vec![
        Deliverable::new(
            SECTIONWISE_CSV,
            render_sectionwise_csv(report)?.into_bytes(),
            "text/csv",
        ),
        Deliverable::new(
            REPORT_MARKDOWN,
            render_report_markdown(report).into_bytes(),
            "text/markdown",
        ),
        Deliverable::new(
            MISSING_ITEMS_MARKDOWN,
            render_missing_items_markdown(report).into_bytes(),
            "text/markdown",
        ),
        Deliverable::new(
            REPORT_JSON,
            serde_json::to_vec_pretty(report)?,
            "application/json",
        ),
    ])
}

pub fn write_deliverables(out_dir: &Path, deliverables: &[Deliverable]) -> CoreResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(deliverables.len());
    for d in deliverables {
        let path = out_dir.join(&d.file_name);
        fs::write(&path, &d.bytes)?;
        written.push(path);
    }
    Ok(written)
}
