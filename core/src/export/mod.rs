pub mod deliverables;
pub mod render;

pub use deliverables::{report_deliverables, write_deliverables, Deliverable};
pub use render::{
    format_score_percent, render_missing_items_markdown, render_report_markdown,
    render_sectionwise_csv,
};
