use crate::error::{CoreError, CoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::client::{classify_reqwest_error, classify_status, OracleClient};
use super::config::OracleConfig;
use super::request::EvaluationRequest;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Oracle backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleOracle {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl OpenAiCompatibleOracle {
    pub fn new(config: &OracleConfig) -> CoreResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_key.trim()
                    ))
                    .map_err(|_| {
                        CoreError::Config("oracle api key is not a valid header value".to_string())
                    })?,
                );
                headers
            })
            .build()
            .map_err(|e| CoreError::Config(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            url: config.chat_completions_url(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl OracleClient for OpenAiCompatibleOracle {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &EvaluationRequest) -> CoreResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        tracing::debug!(
            section = %request.section_id,
            prompt_bytes = request.prompt.len(),
            "sending evaluation request"
        );

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let text = resp.text().await.map_err(|e| classify_reqwest_error(&e))?;
        let envelope: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            CoreError::invalid_response(
                request.section_id.to_string(),
                format!("completion envelope: {}", e),
            )
        })?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CoreError::invalid_response(
                    request.section_id.to_string(),
                    "completion has no message content",
                )
            })?;
        tracing::debug!(
            section = %request.section_id,
            response_bytes = content.len(),
            "received evaluation response"
        );
        Ok(content)
    }
}
