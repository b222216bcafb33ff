pub mod audit;
pub mod checklist;
pub mod determinism;
pub mod export;
pub mod oracle;
pub mod run;
pub mod scoring;

pub mod error;
