pub mod client;
pub mod config;
pub mod http;
pub mod request;
pub mod response;

pub use client::OracleClient;
pub use config::OracleConfig;
pub use http::OpenAiCompatibleOracle;
pub use request::{build_evaluation_request, EvaluationRequest};
pub use response::{parse_oracle_record, OracleVerdict};
