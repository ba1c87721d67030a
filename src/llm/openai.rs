use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::errors::BlackCardError;
use super::provider::LLMProvider;
use super::types::{extract_json, status_error, LLMResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions. Also used for any server that speaks the same
/// protocol, via `with_base_url`.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    name: &'static str,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::build(api_key, model, DEFAULT_BASE_URL, "openai")
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self::build(api_key, model, base_url, "openai_compatible")
    }

    fn build(api_key: &str, model: Option<&str>, base_url: &str, name: &'static str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or("gpt-4o-mini").to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            name,
        }
    }

    async fn chat(&self, messages: Vec<Value>, json_mode: bool) -> Result<LLMResponse, BlackCardError> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": 1024,
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let mut req = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }
        let resp = req
            .send()
            .await
            .map_err(|e| BlackCardError::Network(format!("OpenAI request failed: {}", e)))?;

        if let Some(err) = status_error("OpenAI", resp.status()) {
            return Err(err);
        }

        let data: Value = resp.json().await
            .map_err(|e| BlackCardError::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(BlackCardError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| BlackCardError::LLMApi("No content in OpenAI response".into()))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();
        debug!(model = %self.model, input_tokens, output_tokens, "OpenAI completion");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }
}

fn messages(prompt: String, system: Option<&str>) -> Vec<Value> {
    let mut messages = Vec::new();
    if let Some(sys) = system {
        messages.push(json!({"role": "system", "content": sys}));
    }
    messages.push(json!({"role": "user", "content": prompt}));
    messages
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, BlackCardError> {
        self.chat(messages(prompt.to_string(), system), false).await
    }

    async fn complete_structured(&self, prompt: &str, schema: &Value, system: Option<&str>) -> Result<Value, BlackCardError> {
        let prompt = format!(
            "{}\n\nRespond ONLY with valid JSON matching this schema:\n{}",
            prompt,
            serde_json::to_string_pretty(schema).unwrap_or_default()
        );
        let response = self.chat(messages(prompt, system), true).await?;
        extract_json(&response.content)
    }

    fn provider_name(&self) -> &str { self.name }
    fn model_name(&self) -> &str { &self.model }
}
