use std::sync::LazyLock;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::errors::BlackCardError;
use crate::models::{Category, NewBusiness};
use super::provider::{PlacesProvider, PlacesQuery};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com";
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.nationalPhoneNumber,places.internationalPhoneNumber,places.websiteUri,places.rating,places.userRatingCount";
/// Text Search returns at most this many results per page.
const MAX_PAGE_SIZE: usize = 20;

static INSTAGRAM_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?instagram\.com/([A-Za-z0-9_.]{1,30})/?")
        .expect("instagram pattern is valid")
});

/// Google Places API (New) Text Search.
pub struct GooglePlacesProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: &str, base_url: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
        }
    }
}

/// Search phrase in Spanish, the language the listings are written in.
/// Labels outside the known verticals are searched as given.
pub fn text_query(city: &str, category: &str) -> String {
    let subject = match Category::from_label(category) {
        Category::Other if !category.trim().eq_ignore_ascii_case("other") => category.trim(),
        known => known.label_es(),
    };
    format!("{} en {}", subject, city.trim())
}

/// Instagram handle when the listed website is an Instagram profile.
pub fn instagram_handle(url: &str) -> Option<String> {
    INSTAGRAM_HANDLE
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|h| !matches!(h.as_str(), "p" | "reel" | "explore" | "stories"))
}

/// Turn a Text Search response body into business rows. Entries without an
/// id or name are dropped.
pub fn parse_search_response(data: &Value, query: &PlacesQuery) -> Vec<NewBusiness> {
    let Some(places) = data["places"].as_array() else {
        return Vec::new();
    };

    places
        .iter()
        .filter_map(|p| {
            let place_id = p["id"].as_str()?.to_string();
            let name = p["displayName"]["text"].as_str()?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let website = p["websiteUri"].as_str().map(str::to_string);
            Some(NewBusiness {
                name,
                category: query.category.clone(),
                city: query.city.clone(),
                address: p["formattedAddress"].as_str().map(str::to_string),
                phone: p["internationalPhoneNumber"]
                    .as_str()
                    .or_else(|| p["nationalPhoneNumber"].as_str())
                    .map(str::to_string),
                instagram: website.as_deref().and_then(instagram_handle),
                website,
                rating: p["rating"].as_f64(),
                review_count: p["userRatingCount"].as_i64(),
                place_id: Some(place_id),
                ..Default::default()
            })
        })
        .take(query.limit)
        .collect()
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn search(&self, query: &PlacesQuery) -> Result<Vec<NewBusiness>, BlackCardError> {
        let body = json!({
            "textQuery": text_query(&query.city, &query.category),
            "pageSize": query.limit.clamp(1, MAX_PAGE_SIZE),
            "languageCode": "es",
        });

        let resp = self.client
            .post(format!("{}/v1/places:searchText", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| BlackCardError::Network(format!("Places request failed: {}", e)))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(BlackCardError::RateLimit("Places API quota exceeded".into()));
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(BlackCardError::Authentication("Places API rejected the key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| BlackCardError::Places(format!("Failed to parse Places response: {}", e)))?;
        if let Some(error) = data.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(BlackCardError::Places(msg.to_string()));
        }
        if !status.is_success() {
            return Err(BlackCardError::Places(format!("Places API returned HTTP {}", status)));
        }

        let found = parse_search_response(&data, query);
        debug!(city = %query.city, category = %query.category, found = found.len(), "Places text search");
        Ok(found)
    }

    fn provider_name(&self) -> &str { "google_places" }
}
