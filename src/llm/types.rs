use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::BlackCardError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub model: String,
}

/// Map an HTTP status from a provider onto the error kinds the retry loop
/// understands. `None` means the status is not an error.
pub(crate) fn status_error(provider: &str, status: reqwest::StatusCode) -> Option<BlackCardError> {
    match status.as_u16() {
        429 => Some(BlackCardError::RateLimit(format!("{} rate limit exceeded", provider))),
        401 | 403 => Some(BlackCardError::Authentication(format!("Invalid {} API key", provider))),
        s if s >= 500 => Some(BlackCardError::LLMApi(format!("{} returned HTTP {}", provider, s))),
        _ => None,
    }
}

/// Pull a JSON object out of model output that may wrap it in prose or a
/// markdown fence.
pub fn extract_json(text: &str) -> Result<Value, BlackCardError> {
    if let Ok(v) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(v);
    }
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            let json_str = rest[..end].trim();
            return serde_json::from_str(json_str)
                .map_err(|e| BlackCardError::LLMApi(format!("Invalid JSON in code block: {}", e)));
        }
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return serde_json::from_str(&text[start..=end])
                .map_err(|e| BlackCardError::LLMApi(format!("Invalid JSON extraction: {}", e)));
        }
    }
    Err(BlackCardError::LLMApi("No valid JSON found in LLM response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        let v = extract_json(r#"{"aiScore": 72}"#).unwrap();
        assert_eq!(v["aiScore"], 72);
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Aquí está:\n```json\n{\"aiScore\": 40, \"aiSummary\": \"ok\"}\n```\nSaludos";
        let v = extract_json(text).unwrap();
        assert_eq!(v["aiSummary"], "ok");
    }

    #[test]
    fn test_extract_embedded_object() {
        let v = extract_json("Result: {\"a\": 1} end").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_extract_no_json() {
        assert!(matches!(extract_json("no json here"), Err(BlackCardError::LLMApi(_))));
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;
        assert!(matches!(status_error("anthropic", StatusCode::TOO_MANY_REQUESTS), Some(BlackCardError::RateLimit(_))));
        assert!(matches!(status_error("openai", StatusCode::UNAUTHORIZED), Some(BlackCardError::Authentication(_))));
        assert!(matches!(status_error("openai", StatusCode::BAD_GATEWAY), Some(BlackCardError::LLMApi(_))));
        assert!(status_error("openai", StatusCode::OK).is_none());
    }
}
