pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;

use std::sync::Arc;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use crate::auth::SessionStore;
use crate::config::BlackCardConfig;
use crate::db::Database;
use crate::errors::{BlackCardError, RetryConfig};
use crate::llm::{create_provider, LLMProvider};
use crate::outreach::{Language, OfferCatalog, Sender};
use crate::places::{GooglePlacesProvider, PlacesProvider};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<OfferCatalog>,
    pub llm: Option<Arc<dyn LLMProvider>>,
    pub places: Option<Arc<dyn PlacesProvider>>,
    pub sessions: SessionStore,
    pub require_auth: bool,
    pub api_token: Option<String>,
    /// Signature used when the settings table has none.
    pub sender: Sender,
    pub default_language: Language,
    pub places_limit: usize,
    pub retry: RetryConfig,
}

impl AppState {
    /// State with no external providers and auth disabled.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            catalog: Arc::new(OfferCatalog::new()),
            llm: None,
            places: None,
            sessions: SessionStore::new(),
            require_auth: false,
            api_token: None,
            sender: Sender::default(),
            default_language: Language::Es,
            places_limit: 20,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LLMProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_places(mut self, places: Arc<dyn PlacesProvider>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn with_auth(mut self, require_auth: bool, api_token: Option<&str>) -> Self {
        self.require_auth = require_auth;
        self.api_token = api_token.map(str::to_string);
        self
    }

    /// Sender for new messages: settings table first, then config.
    pub fn sender(&self) -> Result<Sender, BlackCardError> {
        self.db.sender(&self.sender)
    }

    pub fn language(&self) -> Result<Language, BlackCardError> {
        self.db.default_language(self.default_language)
    }
}

pub async fn create_app_state(config: &BlackCardConfig) -> Result<AppState, BlackCardError> {
    let db = Database::new(&config.database().path)?;
    let outreach = config.outreach();
    let server = config.server();
    let places_cfg = config.places();

    let mut state = AppState::new(db)
        .with_auth(server.require_auth, server.api_token.as_deref());
    state.catalog = Arc::new(OfferCatalog::with_overrides(&outreach.loss_overrides)?);
    state.places_limit = places_cfg.default_limit;
    if let Some(lang) = outreach.default_language.as_deref() {
        state.default_language = Language::parse(lang)
            .ok_or_else(|| BlackCardError::Config(format!("Unsupported default_language '{}'", lang)))?;
    }
    let fallback = Sender::default();
    state.sender = Sender {
        name: outreach.sender_name.clone().unwrap_or(fallback.name),
        company: outreach.sender_company.clone().unwrap_or(fallback.company),
    };

    if let Some(llm) = config.llm.as_ref() {
        match (llm.provider.as_deref(), llm.api_key.as_deref()) {
            (Some(provider), key) if key.is_some() || provider == "openai_compatible" => {
                let provider = create_provider(provider, key.unwrap_or(""), llm.model.as_deref(), llm.base_url.as_deref())?;
                info!(llm = %provider.label(), "LLM provider configured");
                state.llm = Some(Arc::from(provider));
            }
            (Some(provider), None) => {
                warn!(provider, "LLM provider has no api_key; enrichment uses the heuristic");
            }
            _ => {}
        }
    }

    match places_cfg.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            state.places = Some(Arc::new(GooglePlacesProvider::new(key, places_cfg.base_url.as_deref())));
        }
        None => warn!("No places api_key configured; scans will fail"),
    }

    Ok(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    if parsed.is_empty() {
        layer
    } else {
        layer.allow_origin(AllowOrigin::list(parsed)).allow_credentials(true)
    }
}

pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, &[])
}

pub fn build_router_with_cors(state: AppState, cors_origins: &[String]) -> Router {
    use routes::*;

    let protected = Router::new()
        .route("/api/settings", get(settings::get_settings).put(settings::update_settings))
        .route("/api/businesses", get(businesses::list_businesses).post(businesses::create_business))
        .route("/api/businesses/stats", get(businesses::business_stats))
        .route("/api/businesses/enrich/batch", post(businesses::enrich_batch))
        .route(
            "/api/businesses/:id",
            get(businesses::get_business)
                .patch(businesses::update_business)
                .delete(businesses::delete_business),
        )
        .route("/api/businesses/:id/status", patch(businesses::update_status))
        .route("/api/businesses/:id/signals", get(businesses::get_signals))
        .route("/api/businesses/:id/enrich", post(businesses::enrich_one))
        .route("/api/scan", get(scan::list_scans).post(scan::create_scan))
        .route("/api/scan/batch", post(scan::batch_scan))
        .route("/api/scan/:id", get(scan::get_scan))
        .route("/api/outreach", get(outreach::list_campaigns))
        .route("/api/outreach/generate", post(outreach::generate_campaign))
        .route("/api/outreach/batch", post(outreach::batch_generate))
        .route("/api/outreach/preview/:business_id", get(outreach::preview))
        .route("/api/outreach/:id", get(outreach::get_campaign).delete(outreach::delete_campaign))
        .route("/api/outreach/:id/status", patch(outreach::update_status))
        .route("/api/copilot/objection", post(copilot::objection))
        .route("/api/copilot/ask", post(copilot::ask))
        .route("/api/blackcard/:business_id", get(blackcard::get_package).post(blackcard::generate_package))
        .route("/api/team/invitations", get(team::list_invitations).post(team::create_invitation))
        .route("/api/team/me", get(team::me))
        .route("/api/team/members", get(team::list_members))
        .route("/api/team/members/:id/role", patch(team::update_role))
        .route("/api/team/activity", get(team::activity))
        .route("/api/intent-signals", get(intent_signals::list_signals).post(intent_signals::create_signal))
        .route("/api/intent-signals/events", get(intent_signals::list_events).post(intent_signals::create_event))
        .route("/api/intent-signals/monitors", get(intent_signals::list_monitors).post(intent_signals::create_monitor))
        .route("/api/intent-signals/:id", delete(intent_signals::delete_signal))
        .route("/api/content/categories", get(content::categories))
        .route("/api/content/frameworks", get(content::frameworks))
        .route("/api/content/objections", get(content::objections))
        .route("/api/content/offers/:category", get(content::offers))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::api_auth_middleware));

    let public = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/team/accept", post(team::accept_invitation))
        .route("/api/team/login", post(team::login))
        .route("/api/team/magic-link", post(team::request_magic_link))
        .route("/api/team/magic-link/verify", post(team::verify_magic_link))
        .route("/api/logout", post(team::logout));

    protected
        .merge(public)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
