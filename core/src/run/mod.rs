pub mod aggregate;
pub mod manager;
pub mod retry;
pub mod section;

pub use aggregate::{aggregate, FailureKind, RunReport, SectionFailure};
pub use manager::{ComplianceRunner, RunInput, RunOptions};
pub use retry::RetryPolicy;
