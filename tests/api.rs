use std::sync::Arc;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use blackcard::api::{build_router, AppState};
use blackcard::db::Database;
use blackcard::errors::BlackCardError;
use blackcard::llm::{LLMProvider, LLMResponse};
use blackcard::models::{NewBusiness, Role};
use blackcard::places::{PlacesProvider, PlacesQuery};

fn create_test_state() -> AppState {
    AppState::new(Database::in_memory().unwrap())
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    make_request_with(method, uri, body, &[])
}

fn make_request_with(
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

/// `name=value` part of the Set-Cookie header, ready to send back.
fn session_cookie(response: &axum::http::Response<Body>) -> String {
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn create_business(state: &AppState, body: Value) -> Value {
    let response = app(state).oneshot(make_request("POST", "/api/businesses", Some(body))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

fn restaurant() -> Value {
    json!({
        "name": "Donde Fidel",
        "category": "restaurante",
        "city": "Cartagena",
        "phone": "300 123 4567",
        "rating": 3.5,
        "reviewCount": 5
    })
}

struct FakePlaces;

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn search(&self, query: &PlacesQuery) -> Result<Vec<NewBusiness>, BlackCardError> {
        Ok(vec![
            NewBusiness {
                name: "Hotel Caribe".into(),
                category: query.category.clone(),
                city: query.city.clone(),
                place_id: Some("place-1".into()),
                rating: Some(4.6),
                review_count: Some(820),
                website: Some("https://hotelcaribe.co".into()),
                ..Default::default()
            },
            NewBusiness {
                name: "Casa Pestagua".into(),
                category: query.category.clone(),
                city: query.city.clone(),
                place_id: Some("place-2".into()),
                rating: Some(4.1),
                review_count: Some(7),
                ..Default::default()
            },
        ])
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

struct CannedLlm;

#[async_trait]
impl LLMProvider for CannedLlm {
    async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<LLMResponse, BlackCardError> {
        Ok(LLMResponse {
            content: format!("answer to: {}", prompt.lines().last().unwrap_or("")),
            input_tokens: Some(10),
            output_tokens: Some(5),
            model: "canned-1".into(),
        })
    }

    async fn complete_structured(&self, _prompt: &str, _schema: &Value, _system: Option<&str>) -> Result<Value, BlackCardError> {
        Ok(json!({"aiScore": 81, "aiSummary": "Alta oportunidad"}))
    }

    fn provider_name(&self) -> &str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-1"
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "blackcard");
    assert_eq!(body["database"], "ok");
    assert!(body["llm"].is_null());
}

#[tokio::test]
async fn test_business_crud() {
    let state = create_test_state();
    let created = create_business(&state, restaurant()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["outreachStatus"], "pending");

    let response = app(&state)
        .oneshot(make_request("PATCH", &format!("/api/businesses/{}", id), Some(json!({"email": "reservas@dondefidel.co"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["email"], "reservas@dondefidel.co");
    assert_eq!(body["name"], "Donde Fidel");

    let response = app(&state)
        .oneshot(make_request("DELETE", &format!("/api/businesses/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(make_request("GET", &format!("/api/businesses/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], format!("Business {} not found", id));
}

#[tokio::test]
async fn test_business_create_requires_name() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/businesses", Some(json!({"name": " ", "category": "bar", "city": "Medellín"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_business_filters() {
    let state = create_test_state();
    create_business(&state, restaurant()).await;
    create_business(&state, json!({"name": "Bar Havana", "category": "bar", "city": "Cartagena", "email": "hola@havana.co"})).await;
    create_business(&state, json!({"name": "Café Pergamino", "category": "cafe", "city": "Medellín"})).await;

    let response = app(&state).oneshot(make_request("GET", "/api/businesses?city=cartagena", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 2);

    let response = app(&state).oneshot(make_request("GET", "/api/businesses?hasEmail=true", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["businesses"][0]["name"], "Bar Havana");

    let response = app(&state).oneshot(make_request("GET", "/api/businesses?search=pergamino", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);

    // Hand-entered Spanish labels land in the same category as scanned rows.
    for query in ["category=restaurant", "category=Restaurantes"] {
        let response = app(&state).oneshot(make_request("GET", &format!("/api/businesses?{}", query), None)).await.unwrap();
        let body = response_json(response).await;
        assert_eq!(body["total"], 1, "{}", query);
        assert_eq!(body["businesses"][0]["category"], "restaurant");
    }

    let response = app(&state).oneshot(make_request("GET", "/api/businesses/stats", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["withEmail"], 1);
}

#[tokio::test]
async fn test_business_status_update() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("PATCH", &format!("/api/businesses/{}/status", id), Some(json!({"status": "contacted"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["outreachStatus"], "contacted");

    let response = app(&state)
        .oneshot(make_request("PATCH", &format!("/api/businesses/{}/status", id), Some(json!({"status": "ghosted"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signals_endpoint() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state).oneshot(make_request("GET", &format!("/api/businesses/{}/signals", id), None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["category"], "restaurant");
    let signals: Vec<&str> = body["signals"].as_array().unwrap().iter().map(|s| s.as_str().unwrap()).collect();
    assert!(signals.contains(&"no_website"));
    assert!(signals.contains(&"low_reviews"));
    assert!(signals.contains(&"manual_booking"));
    assert_eq!(body["recommendedTier"]["name"], "Black Card");
    assert_eq!(body["offer"]["offer"], "AI Booking Bot + Review Management System");
}

#[tokio::test]
async fn test_enrich_without_llm_uses_heuristic() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state).oneshot(make_request("POST", &format!("/api/businesses/{}/enrich", id), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["source"], "heuristic");
    let score = body["business"]["aiScore"].as_i64().unwrap();
    assert!((0..=100).contains(&score));
    assert!(body["business"]["aiSummary"].is_string());
}

#[tokio::test]
async fn test_outreach_generate_and_read_back() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/generate", Some(json!({"businessId": id}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let generated = response_json(response).await;
    let campaign = &generated["campaign"];
    assert_eq!(campaign["status"], "draft");
    assert_eq!(campaign["framework"], "loss_aversion");
    assert_eq!(generated["offer"]["offer"], "AI Booking Bot + Review Management System");
    assert!(campaign["whatsappLink"].as_str().unwrap().starts_with("https://wa.me/573001234567?text="));

    let campaign_id = campaign["id"].as_str().unwrap();
    let response = app(&state).oneshot(make_request("GET", &format!("/api/outreach/{}", campaign_id), None)).await.unwrap();
    let stored = response_json(response).await;
    assert_eq!(stored["emailSubject"], campaign["emailSubject"]);
    assert_eq!(stored["emailBody"], campaign["emailBody"]);
    assert_eq!(stored["followUps"], campaign["followUps"]);
}

#[tokio::test]
async fn test_outreach_preview_is_not_persisted() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("GET", &format!("/api/outreach/preview/{}?tone=urgent&language=en", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["messages"]["framework"], "scarcity");
    assert_eq!(body["messages"]["language"], "en");

    let response = app(&state).oneshot(make_request("GET", "/api/outreach", None)).await.unwrap();
    assert_eq!(response_json(response).await["total"], 0);
}

#[tokio::test]
async fn test_outreach_unknown_tone_rejected() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/generate", Some(json!({"businessId": id, "tone": "sarcastic"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_campaign_status_stamps_once() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/generate", Some(json!({"businessId": id}))))
        .await
        .unwrap();
    let campaign_id = response_json(response).await["campaign"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/outreach/{}/status", campaign_id);

    let response = app(&state).oneshot(make_request("PATCH", &uri, Some(json!({"status": "sent"})))).await.unwrap();
    let sent = response_json(response).await;
    assert_eq!(sent["status"], "sent");
    let sent_at = sent["sentAt"].as_str().unwrap().to_string();

    let response = app(&state).oneshot(make_request("PATCH", &uri, Some(json!({"status": "responded"})))).await.unwrap();
    let responded = response_json(response).await;
    assert_eq!(responded["sentAt"], sent_at);
    assert!(responded["respondedAt"].is_string());

    // Skipping stages is allowed.
    let response = app(&state).oneshot(make_request("PATCH", &uri, Some(json!({"status": "archived"})))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state).oneshot(make_request("PATCH", &uri, Some(json!({"status": "lost"})))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_outreach_counts_and_skip_existing() {
    let state = create_test_state();
    for name in ["La Cevichería", "Carmen", "Alma"] {
        let mut b = restaurant();
        b["name"] = json!(name);
        create_business(&state, b).await;
    }

    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/batch", Some(json!({
            "city": "Cartagena",
            "skipExisting": true,
            "tone": "urgent",
            "language": "en"
        }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["processed"], 3);
    assert_eq!(body["succeeded"], 3);
    assert_eq!(body["errors"], 0);
    let created = body["createdIds"].as_array().unwrap();
    assert_eq!(created.len(), 3);

    // Every stored campaign reads back with exactly the generated copy.
    for id in created {
        let response = app(&state)
            .oneshot(make_request("GET", &format!("/api/outreach/{}", id.as_str().unwrap()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let campaign = response_json(response).await;
        assert_eq!(campaign["framework"], "scarcity");
        assert_eq!(campaign["language"], "en");

        let uri = format!(
            "/api/outreach/preview/{}?tone=urgent&language=en",
            campaign["businessId"].as_str().unwrap()
        );
        let response = app(&state).oneshot(make_request("GET", &uri, None)).await.unwrap();
        let preview = response_json(response).await;
        let messages = &preview["messages"];
        assert_eq!(campaign["emailSubject"], messages["emailSubject"]);
        assert_eq!(campaign["emailBody"], messages["emailBody"]);
        assert_eq!(campaign["whatsappScript"], messages["whatsappScript"]);
        assert_eq!(campaign["whatsappLink"], messages["whatsappLink"]);
    }

    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/batch", Some(json!({"city": "Cartagena", "skipExisting": true}))))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["processed"], 0);
    assert!(body.get("createdIds").is_none());
}

#[tokio::test]
async fn test_batch_enrich_reports_missing_ids() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("POST", "/api/businesses/enrich/batch", Some(json!({"businessIds": [id, "missing"]}))))
        .await
        .unwrap();
    // An unknown id fails the selection before anything runs.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app(&state)
        .oneshot(make_request("POST", "/api/businesses/enrich/batch", Some(json!({"city": "Cartagena", "onlyMissing": true}))))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["processed"], 1);
    assert_eq!(body["message"], "enrich: 1 processed, 1 succeeded, 0 failed");
}

#[tokio::test]
async fn test_scan_without_places_provider() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/scan", Some(json!({"city": "Cartagena", "category": "hotel"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(&state).oneshot(make_request("GET", "/api/scan", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["scans"][0]["status"], "error");
    assert!(body["scans"][0]["errorMessage"].is_string());
}

#[tokio::test]
async fn test_scan_upserts_by_place_id() {
    let state = create_test_state().with_places(Arc::new(FakePlaces));

    for _ in 0..2 {
        let response = app(&state)
            .oneshot(make_request("POST", "/api/scan", Some(json!({"city": "Cartagena", "category": "hotel"}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let scan = response_json(response).await;
        assert_eq!(scan["status"], "completed");
        assert_eq!(scan["totalFound"], 2);
    }

    let response = app(&state).oneshot(make_request("GET", "/api/businesses?category=hotel", None)).await.unwrap();
    assert_eq!(response_json(response).await["total"], 2);

    let response = app(&state)
        .oneshot(make_request("POST", "/api/scan/batch", Some(json!({
            "cities": ["Cartagena", "Santa Marta"],
            "categories": ["hostel"],
            "enrich": true
        }))))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["processed"], 2);
    assert_eq!(body["errors"], 0);
}

#[tokio::test]
async fn test_scan_keeps_unrecognized_category_label() {
    let state = create_test_state().with_places(Arc::new(FakePlaces));
    let response = app(&state)
        .oneshot(make_request("POST", "/api/scan", Some(json!({"city": "Bogotá", "category": " Museo "}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_json(response).await["category"], "museo");

    let response = app(&state).oneshot(make_request("GET", "/api/businesses?category=museo", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["businesses"][0]["category"], "museo");

    let response = app(&state)
        .oneshot(make_request("POST", "/api/scan", Some(json!({"city": "Bogotá", "category": "  "}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_scan_not_found() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/scan/nonexistent-id", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "Scan nonexistent-id not found");
}

#[tokio::test]
async fn test_black_card_package() {
    let state = create_test_state();
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/blackcard/{}", id);

    let response = app(&state).oneshot(make_request("GET", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app(&state).oneshot(make_request("POST", &uri, Some(json!({"language": "en"})))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    assert_eq!(created["language"], "en");
    assert_eq!(created["package"]["messages"].as_array().unwrap().len(), 4);
    assert_eq!(created["package"]["recommendedTier"]["name"], "Black Card");

    let response = app(&state).oneshot(make_request("GET", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["id"], created["id"]);
}

#[tokio::test]
async fn test_copilot_objection_and_ask() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/copilot/objection", Some(json!({"text": "Eso está muy caro para nosotros"}))))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["kind"], "price");
    assert!(!body["script"].as_str().unwrap().contains('{'));

    let response = app(&state)
        .oneshot(make_request("POST", "/api/copilot/objection", Some(json!({"text": "Hmm", "language": "en"}))))
        .await
        .unwrap();
    assert_eq!(response_json(response).await["kind"], "generic");

    let response = app(&state)
        .oneshot(make_request("POST", "/api/copilot/ask", Some(json!({"question": "¿Cómo abro la llamada?"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_copilot_ask_and_enrich_with_llm() {
    let state = create_test_state().with_llm(Arc::new(CannedLlm));
    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("POST", "/api/copilot/ask", Some(json!({"question": "¿Qué le ofrezco?", "businessId": id}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["answer"], "answer to: Question: ¿Qué le ofrezco?");
    assert_eq!(body["model"], "canned-1");

    let response = app(&state).oneshot(make_request("POST", &format!("/api/businesses/{}/enrich", id), None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["source"], "llm");
    assert_eq!(body["business"]["aiScore"], 81);
    assert_eq!(body["business"]["aiReadiness"], "high");
}

#[tokio::test]
async fn test_content_endpoints() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/content/categories", None)).await.unwrap();
    assert_eq!(response_json(response).await["categories"].as_array().unwrap().len(), 9);

    let response = app(&state).oneshot(make_request("GET", "/api/content/frameworks", None)).await.unwrap();
    assert_eq!(response_json(response).await["frameworks"].as_array().unwrap().len(), 4);

    let response = app(&state).oneshot(make_request("GET", "/api/content/offers/restaurante", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["category"], "restaurant");
    assert_eq!(body["pricingTiers"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_settings_flow_into_messages() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("PUT", "/api/settings", Some(json!({"senderName": "Camila", "default_language": "en"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state).oneshot(make_request("GET", "/api/settings", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["senderName"], "Camila");
    assert_eq!(body["defaultLanguage"], "en");

    let id = create_business(&state, restaurant()).await["id"].as_str().unwrap().to_string();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/outreach/generate", Some(json!({"businessId": id}))))
        .await
        .unwrap();
    let campaign = response_json(response).await["campaign"].clone();
    assert_eq!(campaign["language"], "en");
    assert!(campaign["whatsappScript"].as_str().unwrap().contains("Camila"));

    let response = app(&state)
        .oneshot(make_request("PUT", "/api/settings", Some(json!({"defaultLanguage": "fr"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_intent_signals() {
    let state = create_test_state();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/intent-signals", Some(json!({
            "city": "Cartagena",
            "category": "restaurant",
            "title": "Buscan recepcionista bilingüe",
            "details": {"type": "hiring", "role": "recepcionista"}
        }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let signal = response_json(response).await;
    assert_eq!(signal["kind"], "hiring");
    assert_eq!(signal["strength"], 50);

    let response = app(&state).oneshot(make_request("GET", "/api/intent-signals?city=Cartagena", None)).await.unwrap();
    assert_eq!(response_json(response).await["total"], 1);

    let response = app(&state)
        .oneshot(make_request("POST", "/api/intent-signals/monitors", Some(json!({
            "name": "Agenda cultural", "city": "Cartagena", "url": "not a url"
        }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/intent-signals/{}", signal["id"].as_str().unwrap());
    let response = app(&state).oneshot(make_request("DELETE", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app(&state).oneshot(make_request("DELETE", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_required_rejects_anonymous() {
    let state = create_test_state().with_auth(true, Some("admin-token"));

    let response = app(&state).oneshot(make_request("GET", "/api/businesses", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for wrong in ["Bearer wrong", "Bearer admin-tokeN"] {
        let response = app(&state)
            .oneshot(make_request_with("GET", "/api/businesses", None, &[("authorization", wrong)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", wrong);
    }

    let response = app(&state)
        .oneshot(make_request_with("GET", "/api/businesses", None, &[("authorization", "Bearer admin-token")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health stays public.
    let response = app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invitation_accept_login_and_permissions() {
    let state = create_test_state().with_auth(true, Some("admin-token"));
    let admin = [("authorization", "Bearer admin-token")];

    let response = app(&state)
        .oneshot(make_request_with("POST", "/api/team/invitations", Some(json!({"email": "Rep@MachineMind.co", "role": "rep"})), &admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let code = response_json(response).await["code"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/accept", Some(json!({"code": code, "name": "Rep", "password": "cartagena-2026"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("bc_session="));

    // Single use.
    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/accept", Some(json!({"code": code, "name": "Rep", "password": "cartagena-2026"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app(&state)
        .oneshot(make_request_with("GET", "/api/team/me", None, &[("cookie", cookie.as_str())]))
        .await
        .unwrap();
    let me = response_json(response).await;
    assert_eq!(me["user"]["email"], "rep@machinemind.co");
    assert_eq!(me["permissions"]["canDelete"], false);

    let id = {
        let response = app(&state)
            .oneshot(make_request_with("POST", "/api/businesses", Some(restaurant()), &admin))
            .await
            .unwrap();
        response_json(response).await["id"].as_str().unwrap().to_string()
    };
    let response = app(&state)
        .oneshot(make_request_with("DELETE", &format!("/api/businesses/{}", id), None, &[("cookie", cookie.as_str())]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/login", Some(json!({"email": "rep@machinemind.co", "password": "wrong-password"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/login", Some(json!({"email": "rep@machinemind.co", "password": "cartagena-2026"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = session_cookie(&response);

    let response = app(&state)
        .oneshot(make_request_with("POST", "/api/logout", None, &[("cookie", second.as_str())]))
        .await
        .unwrap();
    assert_eq!(response_json(response).await["loggedOut"], true);
    let response = app(&state)
        .oneshot(make_request_with("GET", "/api/team/me", None, &[("cookie", second.as_str())]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(make_request_with("GET", "/api/team/activity", None, &admin))
        .await
        .unwrap();
    let activity = response_json(response).await;
    let actions: Vec<&str> = activity["activity"].as_array().unwrap().iter().map(|a| a["action"].as_str().unwrap()).collect();
    assert!(actions.contains(&"user_joined"));
    assert!(actions.contains(&"invitation_created"));
}

#[tokio::test]
async fn test_expired_invitation_rejected() {
    let state = create_test_state();
    state.db
        .create_invitation("EXPIRED1", "late@machinemind.co", Role::Rep, None, Utc::now() - Duration::hours(1))
        .unwrap();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/accept", Some(json!({"code": "EXPIRED1", "name": "Late", "password": "cartagena-2026"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_magic_link_login() {
    let state = create_test_state();
    state.db.create_user("ana@machinemind.co", "Ana", Role::TeamMember, None).unwrap();

    // Unknown and known emails get the same answer.
    for email in ["ana@machinemind.co", "nobody@machinemind.co"] {
        let response = app(&state)
            .oneshot(make_request("POST", "/api/team/magic-link", Some(json!({"email": email}))))
            .await
            .unwrap();
        assert_eq!(response_json(response).await["sent"], true);
    }

    state.db.create_magic_link("tok-123", "ana@machinemind.co", Utc::now() + Duration::minutes(15)).unwrap();
    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/magic-link/verify", Some(json!({"token": "tok-123"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("bc_session="));
    assert_eq!(response_json(response).await["user"]["role"], "team_member");

    let response = app(&state)
        .oneshot(make_request("POST", "/api/team/magic-link/verify", Some(json!({"token": "tok-123"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
