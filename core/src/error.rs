use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OracleFailureCategory {
    Timeout,
    Connection,
    RateLimited,
    Upstream,
    Rejected,
    Request,
}

impl OracleFailureCategory {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Connection | Self::RateLimited | Self::Upstream
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "TIMEOUT",
            Self::Connection => "CONNECTION",
            Self::RateLimited => "RATE_LIMITED",
            Self::Upstream => "UPSTREAM",
            Self::Rejected => "REJECTED",
            Self::Request => "REQUEST",
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("oracle transport failure ({}): {message}", .category.as_str())]
    OracleTransportFailure {
        category: OracleFailureCategory,
        message: String,
        retryable: bool,
    },

    #[error("oracle response invalid for {section}: {reason}")]
    OracleResponseInvalid { section: String, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoreError {
    pub fn transport(category: OracleFailureCategory, message: impl Into<String>) -> Self {
        CoreError::OracleTransportFailure {
            category,
            message: message.into(),
            retryable: category.is_retryable(),
        }
    }

    pub fn invalid_response(section: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::OracleResponseInvalid {
            section: section.into(),
            reason: reason.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::OracleTransportFailure {
                retryable: true,
                ..
            }
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
