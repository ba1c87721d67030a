use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::api::auth::Actor;
use crate::api::models::{BatchResponse, BatchScanRequest, CreateScanRequest, LimitQuery};
use crate::api::AppState;
use crate::enrich::enrich_business;
use crate::errors::{with_retry, BlackCardError};
use crate::models::{ActivityDetails, Category, Scan, ScanStatus};
use crate::places::PlacesQuery;
use super::businesses::record;
use super::ApiResult;

const MAX_SCAN_LIMIT: usize = 60;

/// Run one (city, category) scan to a terminal state. The scan row is
/// always left at `completed` or `error`; the error is also returned.
pub async fn run_scan(
    state: &AppState,
    city: &str,
    category: &str,
    limit: usize,
    enrich: bool,
) -> ApiResult<Scan> {
    let city = city.trim();
    let label = Category::normalize_label(category);
    if city.is_empty() {
        return Err(BlackCardError::Validation("city is required".into()));
    }
    if label.is_empty() {
        return Err(BlackCardError::Validation("category is required".into()));
    }
    let category = label.as_str();

    let scan_id = uuid::Uuid::new_v4().to_string();
    state.db.create_scan(&scan_id, city, category)?;

    let Some(places) = state.places.as_deref() else {
        let e = BlackCardError::Config("No places provider configured".into());
        state.db.fail_scan(&scan_id, &e.to_string())?;
        return Err(e);
    };

    state.db.update_scan_status(&scan_id, ScanStatus::Scanning)?;
    info!(scan_id = %scan_id, city, category, limit, provider = places.provider_name(), "Scan started");

    let query = PlacesQuery {
        city: city.to_string(),
        category: category.to_string(),
        limit: limit.clamp(1, MAX_SCAN_LIMIT),
    };
    let query = &query;
    let found = match with_retry("places_search", &state.retry, move || places.search(query)).await {
        Ok(found) => found,
        Err(e) => {
            warn!(scan_id = %scan_id, error = %e, "Scan failed");
            state.db.fail_scan(&scan_id, &e.to_string())?;
            return Err(e);
        }
    };

    let mut stored = Vec::with_capacity(found.len());
    for new in &found {
        match state.db.upsert_business_by_place(new, &scan_id) {
            Ok(b) => stored.push(b),
            Err(e) => warn!(scan_id = %scan_id, name = %new.name, error = %e, "Failed to store scanned business"),
        }
    }

    let mut enriched = 0;
    if enrich {
        for business in &stored {
            let outcome = enrich_business(business, &state.catalog, state.llm.as_deref(), &state.retry).await;
            match state.db.set_enrichment(&business.id, &outcome.enrichment) {
                Ok(()) => enriched += 1,
                Err(e) => warn!(business_id = %business.id, error = %e, "Failed to store enrichment"),
            }
        }
    }

    state.db.complete_scan(&scan_id, stored.len() as i64, enriched)?;
    info!(scan_id = %scan_id, found = stored.len(), enriched, "Scan completed");
    state.db.get_scan(&scan_id)?
        .ok_or_else(|| BlackCardError::NotFound(format!("Scan {}", scan_id)))
}

pub async fn create_scan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateScanRequest>,
) -> ApiResult<(StatusCode, Json<Scan>)> {
    actor.require(|p| p.can_scan, "run scans")?;
    let limit = req.limit.unwrap_or(state.places_limit);
    let scan = run_scan(&state, &req.city, &req.category, limit, req.enrich).await?;
    record(&state, &actor, ActivityDetails::ScanCompleted {
        scan_id: scan.id.clone(),
        total_found: scan.total_found,
    });
    Ok((StatusCode::CREATED, Json(scan)))
}

pub async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Value>> {
    let scans = state.db.list_scans(query.limit.unwrap_or(20).min(200))?;
    Ok(Json(json!({ "scans": scans, "total": scans.len() })))
}

pub async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Scan>> {
    state.db.get_scan(&id)?
        .map(Json)
        .ok_or_else(|| BlackCardError::NotFound(format!("Scan {}", id)))
}

/// Every city × category pair, one after another.
pub async fn batch_scan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BatchScanRequest>,
) -> ApiResult<Json<BatchResponse>> {
    actor.require(|p| p.can_scan, "run scans")?;
    if state.places.is_none() {
        return Err(BlackCardError::Config("No places provider configured".into()));
    }
    let limit = req.limit.unwrap_or(state.places_limit);

    let mut processed = 0;
    let mut errors = 0;
    let mut scan_ids = Vec::new();
    for city in &req.cities {
        for category in &req.categories {
            processed += 1;
            match run_scan(&state, city, category, limit, req.enrich).await {
                Ok(scan) => scan_ids.push(scan.id),
                Err(e) => {
                    warn!(city = %city, category = %category, error = %e, "Batch scan item failed");
                    errors += 1;
                }
            }
        }
    }

    record(&state, &actor, ActivityDetails::BatchRun { operation: "scan".into(), processed, errors });
    Ok(Json(BatchResponse::new("scan", processed, errors, scan_ids)))
}
