use async_trait::async_trait;
use crate::errors::BlackCardError;
use super::types::LLMResponse;

/// A chat-completion backend used by enrichment and the sales copilot.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<LLMResponse, BlackCardError>;

    /// The schema goes out as an instruction only; callers still check the
    /// fields they read.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        system: Option<&str>,
    ) -> Result<serde_json::Value, BlackCardError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;

    /// `provider/model`, as reported by `/api/health`.
    fn label(&self) -> String {
        format!("{}/{}", self.provider_name(), self.model_name())
    }
}
