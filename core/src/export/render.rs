use crate::error::CoreResult;
use crate::run::RunReport;
use crate::scoring::SectionResult;

pub const SHEET_HEADERS: [&str; 7] = [
    "DPDPA Section",
    "DPDPA Section Meaning",
    "Checklist Items",
    "Match Level",
    "Severity",
    "Compliance Points",
    "Suggested Rewrite",
];

/// "21.43%"
pub fn format_score_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

fn checklist_items_json(section: &SectionResult) -> CoreResult<String> {
    let items: Vec<serde_json::Value> = section
        .item_verdicts()
        .iter()
        .map(|v| {
            serde_json::json!({
                "Item": v.item,
                "Matched": v.matched,
                "Matched Sentences": v.matched_sentences,
                "Justification": v.justification,
            })
        })
        .collect();
    Ok(serde_json::to_string(&items)?)
}

/// One row per scored section, in section order.
pub fn render_sectionwise_csv(report: &RunReport) -> CoreResult<String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(SHEET_HEADERS)?;
    for section in report.sections() {
        wtr.write_record(&[
            section.section_id().label(),
            section.section_meaning().to_string(),
            checklist_items_json(section)?,
            section.match_level().as_str().to_string(),
            section.severity().as_str().to_string(),
            format!("{:.2}", section.compliance_points()),
            section.suggested_rewrite().to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render_report_markdown(report: &RunReport) -> String {
    let mut out = vec![
        "# DPDPA Compliance Report".to_string(),
        String::new(),
        format!(
            "Compliance Score: {} ({:.2} of {} points)",
            format_score_percent(report.overall_score_percent()),
            report.total_points(),
            report.expected_section_count()
        ),
        String::new(),
        "| Section | Match Level | Severity | Points | Unmatched Items |".to_string(),
        "|---|---|---|---|---|".to_string(),
    ];
    for section in report.sections() {
        out.push(format!(
            "| {} | {} | {} | {:.2} | {} of {} |",
            cell(&section.section_id().label()),
            section.match_level().as_str(),
            section.severity().as_str(),
            section.compliance_points(),
            section.unmatched_count(),
            section.item_verdicts().len()
        ));
    }
    out.push(String::new());

    if !report.failures().is_empty() {
        out.push("## Sections Not Evaluated".to_string());
        out.push(String::new());
        for failure in report.failures() {
            out.push(format!(
                "- {} ({}, {} attempt(s)): {}",
                failure.section_id.label(),
                failure.kind.as_str(),
                failure.attempts,
                failure.message
            ));
        }
        out.push(String::new());
    }

    let rewrites: Vec<&SectionResult> = report
        .sections()
        .iter()
        .filter(|s| !s.suggested_rewrite().trim().is_empty())
        .collect();
    if !rewrites.is_empty() {
        out.push("## Suggested Rewrites".to_string());
        out.push(String::new());
        for section in rewrites {
            out.push(format!("### {}", section.section_id().label()));
            out.push(String::new());
            out.push(section.suggested_rewrite().trim().to_string());
            out.push(String::new());
        }
    }
    out.join("\n")
}

pub fn render_missing_items_markdown(report: &RunReport) -> String {
    let mut out = vec!["# Missing Checklist Items".to_string(), String::new()];
    let mut any_missing = false;
    for section in report.sections() {
        let missing: Vec<_> = section.unmatched_items().collect();
        if missing.is_empty() {
            continue;
        }
        any_missing = true;
        out.push(format!("## {}", section.section_id().label()));
        out.push(String::new());
        for verdict in missing {
            out.push(format!("- [ ] {}", verdict.item));
        }
        out.push(String::new());
    }
    if !any_missing {
        out.push("- [x] No missing checklist items in evaluated sections.".to_string());
        out.push(String::new());
    }
    out.join("\n")
}
