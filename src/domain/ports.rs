use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Settings shared by every configuration source.
pub trait ConfigProvider: Send + Sync {
    fn narrative_enabled(&self) -> bool;
    fn narrative_endpoint(&self) -> &str;
    fn narrative_model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    /// Per HTTP call.
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    /// Upper bound on the whole narrative step, retries included.
    fn narrative_budget(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    pub prompt: String,
    /// Overrides the configured key for this call only.
    pub api_key: Option<String>,
}

/// External text generation. Opaque to the numeric engine.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String>;
}
