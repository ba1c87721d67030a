use super::types::BlackCardError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl BlackCardError {
    /// Classify this error to determine its type and whether it can be retried.
    ///
    /// Only failures of external collaborators (LLM, places lookup, network)
    /// are worth retrying; everything caused by the request or local state is not.
    pub fn classify(&self) -> ErrorClassification {
        let (error_type, retryable) = match self {
            BlackCardError::RateLimit(_) => ("RateLimitError", true),
            BlackCardError::Network(_) => ("NetworkError", true),
            BlackCardError::LLMApi(_) => ("LLMApiError", true),
            BlackCardError::Places(_) => ("PlacesError", true),

            BlackCardError::Config(_) => ("ConfigError", false),
            BlackCardError::Authentication(_) => ("AuthenticationError", false),
            BlackCardError::Permission(_) => ("PermissionError", false),
            BlackCardError::NotFound(_) => ("NotFoundError", false),
            BlackCardError::Validation(_) => ("ValidationError", false),
            BlackCardError::Conflict(_) => ("ConflictError", false),
            BlackCardError::LLMUnavailable => ("LLMUnavailableError", false),
            BlackCardError::Io(_) => ("IoError", false),
            BlackCardError::Json(_) => ("JsonError", false),
            BlackCardError::Yaml(_) => ("YamlError", false),
            BlackCardError::Database(_) => ("DatabaseError", false),
            BlackCardError::Internal(_) => ("InternalError", false),
        };
        ErrorClassification { error_type, retryable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_retryable() {
        let err = BlackCardError::RateLimit("too many requests".into());
        let class = err.classify();
        assert!(class.retryable);
        assert_eq!(class.error_type, "RateLimitError");
    }

    #[test]
    fn test_auth_error_not_retryable() {
        let err = BlackCardError::Authentication("bad key".into());
        let class = err.classify();
        assert!(!class.retryable);
        assert_eq!(class.error_type, "AuthenticationError");
    }

    #[test]
    fn test_places_error_retryable() {
        let err = BlackCardError::Places("upstream 503".into());
        assert!(err.classify().retryable);
    }

    #[test]
    fn test_validation_not_retryable() {
        let err = BlackCardError::Validation("city is required".into());
        assert!(!err.classify().retryable);
    }

    #[test]
    fn test_llm_unavailable_not_retryable() {
        assert!(!BlackCardError::LLMUnavailable.classify().retryable);
    }
}
