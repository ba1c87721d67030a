use std::path::Path;
use crate::errors::BlackCardError;
use crate::models::Category;
use crate::outreach::{Language, OfferCatalog};
use super::credentials::resolve_credential;
use super::types::BlackCardConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<BlackCardConfig, BlackCardError> {
    if !path.exists() {
        return Err(BlackCardError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(BlackCardError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Parse, validate and resolve `$ENV` references in a YAML config document.
pub fn parse_config_str(content: &str) -> Result<BlackCardConfig, BlackCardError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(BlackCardConfig::default());
    }

    validate_schema(&yaml)?;

    let mut config: BlackCardConfig = serde_yaml::from_value(yaml)?;
    resolve_secrets(&mut config);
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), BlackCardError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| BlackCardError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| BlackCardError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        // Advisory: typed deserialization below is the hard gate.
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

fn resolve_secrets(config: &mut BlackCardConfig) {
    if let Some(server) = config.server.as_mut() {
        server.api_token = server.api_token.as_deref().map(resolve_credential);
    }
    if let Some(llm) = config.llm.as_mut() {
        llm.api_key = llm.api_key.as_deref().map(resolve_credential);
    }
    if let Some(places) = config.places.as_mut() {
        places.api_key = places.api_key.as_deref().map(resolve_credential);
    }
}

/// Checks the schema cannot express.
fn validate_semantics(config: &BlackCardConfig) -> Result<(), BlackCardError> {
    let outreach = config.outreach();

    if let Some(lang) = &outreach.default_language {
        if Language::parse(lang).is_none() {
            return Err(BlackCardError::Config(format!("Unsupported default_language '{}'", lang)));
        }
    }

    for o in &outreach.loss_overrides {
        if Category::from_label(&o.category) == Category::Other && o.category.trim().to_lowercase() != "other" {
            warn!(category = %o.category, "Loss override category not recognized, applying to 'other'");
        }
    }
    // Unknown offers and inverted ranges are rejected here rather than at start-up.
    OfferCatalog::with_overrides(&outreach.loss_overrides)?;

    let server = config.server();
    if server.port == 0 {
        return Err(BlackCardError::Config("server.port must be non-zero".into()));
    }
    if server.require_auth && server.api_token.as_deref().map_or(true, str::is_empty) {
        warn!("require_auth is on without api_token; only session cookies will be accepted");
    }

    if let Some(llm) = &config.llm {
        if llm.api_key.as_deref().map_or(true, str::is_empty) && llm.provider.is_some() {
            warn!(provider = ?llm.provider, "LLM provider configured without api_key");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let config = parse_config_str("").unwrap();
        assert!(config.server.is_none());
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
server:
  port: 9090
  require_auth: true
  api_token: secret-token
database:
  path: /tmp/bc.db
llm:
  provider: anthropic
  api_key: sk-test
outreach:
  default_language: en
  sender_name: Camila
  loss_overrides:
    - category: restaurant
      offer: "AI Booking Bot + Review Management System"
      min: 2500
      max: 5500
"#;
        let config = parse_config_str(yaml).unwrap();
        let server = config.server();
        assert_eq!(server.port, 9090);
        assert!(server.require_auth);
        assert_eq!(server.api_token.as_deref(), Some("secret-token"));
        assert_eq!(config.database().path, "/tmp/bc.db");
        assert_eq!(config.outreach().sender_name.as_deref(), Some("Camila"));
        assert_eq!(config.outreach().loss_overrides[0].min, 2500);
    }

    #[test]
    fn test_env_reference_resolved() {
        std::env::set_var("TEST_BLACKCARD_LLM_KEY", "sk-from-env");
        let config = parse_config_str("llm:\n  provider: openai\n  api_key: $TEST_BLACKCARD_LLM_KEY\n").unwrap();
        assert_eq!(config.llm.unwrap().api_key.as_deref(), Some("sk-from-env"));
        std::env::remove_var("TEST_BLACKCARD_LLM_KEY");
    }

    #[test]
    fn test_bad_language_rejected() {
        let result = parse_config_str("outreach:\n  default_language: fr\n");
        assert!(matches!(result, Err(BlackCardError::Config(_))));
    }

    #[test]
    fn test_inverted_loss_override_rejected() {
        let yaml = r#"
outreach:
  loss_overrides:
    - category: hotel
      offer: "AI Guest Experience Automation"
      min: 4000
      max: 1000
"#;
        assert!(parse_config_str(yaml).is_err());
    }

    #[test]
    fn test_wrong_type_fails_deserialization() {
        let result = parse_config_str("server:\n  port: not-a-number\n");
        assert!(matches!(result, Err(BlackCardError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let result = parse_config(Path::new("/nonexistent/blackcard.yaml")).await;
        assert!(matches!(result, Err(BlackCardError::Config(_))));
    }

    #[tokio::test]
    async fn test_parse_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blackcard.yaml");
        std::fs::write(&path, "database:\n  path: ./x.db\n").unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.database().path, "./x.db");
    }
}
