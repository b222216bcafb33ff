pub mod model;
pub mod registry;

pub use model::{ChecklistItem, SectionChecklist, SectionId};
pub use registry::ChecklistRegistry;
