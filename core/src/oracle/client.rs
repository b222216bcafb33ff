use crate::error::{CoreError, CoreResult, OracleFailureCategory};
use async_trait::async_trait;

use super::request::EvaluationRequest;

/// The external text-understanding service. One call per section, no retries.
#[async_trait]
pub trait OracleClient: Send + Sync {
    fn model_id(&self) -> &str;

    /// Returns the raw structured record text produced for `request`.
    async fn complete(&self, request: &EvaluationRequest) -> CoreResult<String>;
}

#[async_trait]
impl<T: OracleClient + ?Sized> OracleClient for std::sync::Arc<T> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn complete(&self, request: &EvaluationRequest) -> CoreResult<String> {
        (**self).complete(request).await
    }
}

pub fn classify_status(status: u16, body: &str) -> CoreError {
    let category = match status {
        408 => OracleFailureCategory::Timeout,
        429 => OracleFailureCategory::RateLimited,
        500..=599 => OracleFailureCategory::Upstream,
        _ => OracleFailureCategory::Rejected,
    };
    CoreError::transport(category, format!("oracle returned {}: {}", status, truncate(body)))
}

pub fn classify_reqwest_error(err: &reqwest::Error) -> CoreError {
    let category = if err.is_timeout() {
        OracleFailureCategory::Timeout
    } else if err.is_connect() {
        OracleFailureCategory::Connection
    } else {
        OracleFailureCategory::Request
    };
    CoreError::transport(category, err.to_string())
}

const MAX_ERROR_BODY: usize = 512;

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
