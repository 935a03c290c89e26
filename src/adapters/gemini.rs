use crate::domain::ports::{ConfigProvider, NarrativeRequest, NarrativeService};
use crate::utils::error::{LifeCodeError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match self.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(LifeCodeError::narrative(format!("prompt blocked: {}", reason))),
            None => Err(LifeCodeError::narrative("response contained no text")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

enum Failure {
    Retryable(LifeCodeError),
    Fatal(LifeCodeError),
}

/// `generateContent` client for Gemini-compatible endpoints.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.narrative_endpoint().trim_end_matches('/').to_string(),
            model: config.narrative_model().to_string(),
            api_key: config.api_key().map(str::to_string),
            retry_attempts: config.retry_attempts(),
            retry_delay: config.retry_delay(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    async fn attempt(&self, api_key: &str, prompt: &str) -> std::result::Result<String, Failure> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Failure::Retryable(e.into()))?;

        let status = response.status();
        tracing::debug!("Narrative response status: {}", status);

        if status.is_success() {
            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| Failure::Fatal(e.into()))?;
            return parsed.into_text().map_err(Failure::Fatal);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(envelope) => format!(
                "{} {}: {}",
                envelope.error.code.unwrap_or(status.as_u16()),
                envelope.error.status.unwrap_or_default(),
                envelope
                    .error
                    .message
                    .unwrap_or_else(|| "no message".to_string())
            ),
            Err(_) => format!("HTTP {}", status),
        };
        let error = LifeCodeError::narrative(message);

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Err(Failure::Retryable(error))
        } else {
            Err(Failure::Fatal(error))
        }
    }
}

#[async_trait]
impl NarrativeService for GeminiClient {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String> {
        let api_key = request
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LifeCodeError::narrative("no API key configured"))?;

        let attempts = self.retry_attempts + 1;
        let mut attempt = 1;
        loop {
            tracing::debug!(
                "Calling narrative model {} (attempt {}/{})",
                self.model,
                attempt,
                attempts
            );
            match self.attempt(api_key, &request.prompt).await {
                Ok(text) => return Ok(text),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Retryable(e)) if attempt < attempts => {
                    tracing::warn!(
                        "🔁 Narrative attempt {} failed: {}; retrying in {:?}",
                        attempt,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(Failure::Retryable(e)) => return Err(e),
            }
        }
    }
}
