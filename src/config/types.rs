use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BlackCardConfig {
    pub server: Option<ServerConfig>,
    pub database: Option<DatabaseConfig>,
    pub llm: Option<LLMConfig>,
    pub places: Option<PlacesConfig>,
    pub outreach: Option<OutreachConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// When false every route is open; used for local development.
    #[serde(default)]
    pub require_auth: bool,
    /// Bearer token accepted in place of a session cookie (for scripts).
    pub api_token: Option<String>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            require_auth: false,
            api_token: None,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "./data/blackcard.db".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LLMConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_places_limit")]
    pub default_limit: usize,
}

fn default_places_limit() -> usize {
    20
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            default_limit: default_places_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutreachConfig {
    pub default_language: Option<String>,
    pub sender_name: Option<String>,
    pub sender_company: Option<String>,
    #[serde(default)]
    pub loss_overrides: Vec<LossOverride>,
}

/// Replace the literal loss range of one offer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LossOverride {
    pub category: String,
    pub offer: String,
    pub min: i64,
    pub max: i64,
}

impl BlackCardConfig {
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }

    pub fn places(&self) -> PlacesConfig {
        self.places.clone().unwrap_or_default()
    }

    pub fn outreach(&self) -> OutreachConfig {
        self.outreach.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackcard_config_default() {
        let config = BlackCardConfig::default();
        assert!(config.server.is_none());
        assert!(config.llm.is_none());
        assert_eq!(config.server().port, 8080);
        assert_eq!(config.database().path, "./data/blackcard.db");
        assert_eq!(config.places().default_limit, 20);
        assert!(config.outreach().loss_overrides.is_empty());
    }

    #[test]
    fn test_server_section_fills_defaults() {
        let server: ServerConfig = serde_yaml::from_str("require_auth: true").unwrap();
        assert!(server.require_auth);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert!(server.cors_origins.is_empty());
    }
}
