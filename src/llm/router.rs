use crate::errors::BlackCardError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
) -> Result<Box<dyn LLMProvider>, BlackCardError> {
    match provider_name {
        "anthropic" => Ok(Box::new(AnthropicProvider::new(api_key, model, base_url))),
        "openai" => match base_url {
            Some(url) => Ok(Box::new(OpenAIProvider::with_base_url(api_key, model, url))),
            None => Ok(Box::new(OpenAIProvider::new(api_key, model))),
        },
        "openai_compatible" => {
            let url = base_url.ok_or_else(|| {
                BlackCardError::Config("llm.base_url is required for openai_compatible".into())
            })?;
            Ok(Box::new(OpenAIProvider::with_base_url(api_key, model, url)))
        }
        _ => Err(BlackCardError::Config(format!("Unknown LLM provider: {}", provider_name))),
    }
}
