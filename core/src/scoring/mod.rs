pub mod model;
pub mod scorer;

pub use model::{ChecklistItemVerdict, MatchLevel, SectionResult, Severity};
pub use scorer::{classify, compliance_points, score_section};
