use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use crate::api::models::CityQuery;
use crate::api::AppState;
use crate::errors::BlackCardError;
use crate::models::{Event, IntentFilter, IntentSignal, NewEvent, NewIntentSignal, NewVenueMonitor, VenueMonitor};
use super::ApiResult;

fn require_text(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(BlackCardError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub async fn list_signals(
    State(state): State<AppState>,
    Query(filter): Query<IntentFilter>,
) -> ApiResult<Json<Value>> {
    let signals = state.db.list_intent_signals(&filter)?;
    Ok(Json(json!({ "signals": signals, "total": signals.len() })))
}

pub async fn create_signal(
    State(state): State<AppState>,
    Json(req): Json<NewIntentSignal>,
) -> ApiResult<(StatusCode, Json<IntentSignal>)> {
    require_text(&req.city, "city")?;
    require_text(&req.title, "title")?;
    let signal = state.db.create_intent_signal(&req)?;
    info!(signal_id = %signal.id, kind = %signal.kind, city = %signal.city, "Intent signal recorded");
    Ok((StatusCode::CREATED, Json(signal)))
}

pub async fn delete_signal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.db.delete_intent_signal(&id)? {
        return Err(BlackCardError::NotFound(format!("Intent signal {}", id)));
    }
    Ok(Json(json!({"deleted": true})))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> ApiResult<Json<Value>> {
    let events = state.db.list_events(query.city.as_deref())?;
    Ok(Json(json!({ "events": events })))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewEvent>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    require_text(&req.name, "name")?;
    require_text(&req.city, "city")?;
    Ok((StatusCode::CREATED, Json(state.db.create_event(&req)?)))
}

pub async fn list_monitors(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let monitors = state.db.list_venue_monitors()?;
    Ok(Json(json!({ "monitors": monitors })))
}

pub async fn create_monitor(
    State(state): State<AppState>,
    Json(req): Json<NewVenueMonitor>,
) -> ApiResult<(StatusCode, Json<VenueMonitor>)> {
    require_text(&req.name, "name")?;
    require_text(&req.city, "city")?;
    Ok((StatusCode::CREATED, Json(state.db.create_venue_monitor(&req)?)))
}
