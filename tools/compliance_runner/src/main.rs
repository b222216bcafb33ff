//! # dpdpa-check
//!
//! Evaluates a privacy policy against the DPDPA Chapter II checklists and
//! writes the section-wise report.

mod config;

use anyhow::Context;
use clap::Parser;
use dpdpa_core::audit::log::AuditLog;
use dpdpa_core::checklist::{ChecklistRegistry, SectionId};
use dpdpa_core::export::{format_score_percent, report_deliverables, write_deliverables};
use dpdpa_core::oracle::OpenAiCompatibleOracle;
use dpdpa_core::run::{ComplianceRunner, RetryPolicy, RunInput, RunOptions};
use std::path::PathBuf;
use std::time::Duration;

/// DPDPA compliance checker for privacy policies.
///
/// Reads the oracle credentials from OPENAI_API_KEY.
#[derive(Parser, Debug)]
#[command(name = "dpdpa-check", version, about)]
struct Cli {
    /// Privacy policy text file.
    #[arg(long)]
    policy: PathBuf,

    /// DPDPA Chapter II text file, sent as reference context.
    #[arg(long)]
    chapter: PathBuf,

    /// Directory for the report files.
    #[arg(long, default_value = "dpdpa_report")]
    out_dir: PathBuf,

    /// Append a hash-chained audit trail of the run to this NDJSON file.
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// Sections evaluated concurrently.
    #[arg(long, default_value_t = 1)]
    max_in_flight: usize,

    /// Oracle attempts per section for transient failures.
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Per-call timeout for one section.
    #[arg(long)]
    section_timeout_secs: Option<u64>,

    /// Flag a checklist item as critical, e.g. `8:6` for the sixth item of Section 8.
    #[arg(long = "critical", value_parser = parse_critical)]
    critical: Vec<(SectionId, usize)>,
}

fn parse_critical(raw: &str) -> Result<(SectionId, usize), String> {
    let (section, item) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SECTION:ITEM, got {raw:?}"))?;
    let section: SectionId = section.parse().map_err(|e| format!("{e}"))?;
    let item: usize = item
        .trim()
        .parse()
        .map_err(|_| format!("item number must be a positive integer, got {item:?}"))?;
    if item == 0 {
        return Err("item numbers start at 1".to_string());
    }
    Ok((section, item))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let policy_text = std::fs::read_to_string(&cli.policy)
        .with_context(|| format!("reading policy text {}", cli.policy.display()))?;
    let chapter_text = std::fs::read_to_string(&cli.chapter)
        .with_context(|| format!("reading chapter text {}", cli.chapter.display()))?;
    let input = RunInput::new(policy_text, chapter_text)?;

    let mut registry = ChecklistRegistry::builtin();
    for (section, item) in &cli.critical {
        registry.mark_critical(*section, item - 1)?;
    }

    let oracle_config = config::oracle_config_from_env()?;
    tracing::info!(config = ?oracle_config, "oracle configured");
    let oracle = OpenAiCompatibleOracle::new(&oracle_config)?;

    let options = RunOptions {
        max_in_flight: cli.max_in_flight,
        retry: RetryPolicy {
            max_attempts: cli.max_attempts,
            ..RetryPolicy::default()
        },
        section_timeout: cli.section_timeout_secs.map(Duration::from_secs),
    };
    let runner = ComplianceRunner::new(registry, oracle, options);

    let report = match &cli.audit_log {
        Some(path) => {
            let mut audit = AuditLog::open_or_create(path)
                .with_context(|| format!("opening audit log {}", path.display()))?;
            runner.run_audited(&input, &mut audit).await?
        }
        None => runner.run(&input).await,
    };

    let written = write_deliverables(&cli.out_dir, &report_deliverables(&report)?)
        .with_context(|| format!("writing report to {}", cli.out_dir.display()))?;

    for section in report.sections() {
        println!(
            "SECTION {} {} {} {:.2}",
            section.section_id(),
            section.match_level().as_str(),
            section.severity().as_str(),
            section.compliance_points()
        );
    }
    for failure in report.failures() {
        eprintln!(
            "FAILED {} {}: {}",
            failure.section_id,
            failure.kind.as_str(),
            failure.message
        );
    }
    println!(
        "COMPLIANCE_SCORE {}",
        format_score_percent(report.overall_score_percent())
    );
    for path in written {
        println!("WROTE {}", path.display());
    }
    Ok(())
}
