use crate::error::{CoreError, CoreResult};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
///
/// `Debug` redacts `api_key`.
#[derive(Clone)]
pub struct OracleConfig {
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OracleConfig {
    pub fn new(api_key: impl Into<String>) -> CoreResult<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| CoreError::Config(format!("default base url: {}", e)))?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(CoreError::Config("oracle api key is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(CoreError::Config("oracle model is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config(
                "oracle timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}
