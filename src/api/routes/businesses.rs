use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::api::auth::Actor;
use crate::api::models::{BatchEnrichRequest, BatchResponse, BatchSelection, StatusUpdateRequest};
use crate::api::AppState;
use crate::enrich::{enrich_business, EnrichmentOutcome};
use crate::errors::BlackCardError;
use crate::models::{ActivityDetails, Business, BusinessFilter, BusinessPatch, NewBusiness, OutreachStatus};
use crate::outreach::{detect_signals, tables};
use super::ApiResult;

/// Activity logging never fails the request that triggered it.
pub(crate) fn record(state: &AppState, actor: &Actor, details: ActivityDetails) {
    if let Err(e) = state.db.log_activity(actor.user_id(), &details) {
        warn!(action = details.action(), error = %e, "Failed to write activity log");
    }
}

/// Businesses a batch run should walk, in list order.
pub(crate) fn select_businesses(state: &AppState, selection: &BatchSelection) -> ApiResult<Vec<Business>> {
    match selection.business_ids.as_ref().filter(|ids| !ids.is_empty()) {
        Some(ids) => {
            let mut out = Vec::with_capacity(ids.len());
            for id in ids {
                out.push(state.db.require_business(id)?);
            }
            Ok(out)
        }
        None => state.db.list_businesses(&BusinessFilter {
            city: selection.city.clone(),
            category: selection.category.clone(),
            status: selection.status.clone(),
            limit: Some(selection.limit.unwrap_or(50)),
            ..Default::default()
        }),
    }
}

pub async fn list_businesses(
    State(state): State<AppState>,
    Query(filter): Query<BusinessFilter>,
) -> ApiResult<Json<Value>> {
    let businesses = state.db.list_businesses(&filter)?;
    Ok(Json(json!({ "businesses": businesses, "total": businesses.len() })))
}

pub async fn create_business(
    State(state): State<AppState>,
    Json(req): Json<NewBusiness>,
) -> ApiResult<(StatusCode, Json<Business>)> {
    if req.name.trim().is_empty() || req.city.trim().is_empty() {
        return Err(BlackCardError::Validation("name and city are required".into()));
    }
    if req.category.trim().is_empty() {
        return Err(BlackCardError::Validation("category is required".into()));
    }
    let business = state.db.create_business(&req, None)?;
    info!(business_id = %business.id, name = %business.name, "Business created");
    Ok((StatusCode::CREATED, Json(business)))
}

pub async fn business_stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(serde_json::to_value(state.db.business_stats()?)?))
}

pub async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Business>> {
    Ok(Json(state.db.require_business(&id)?))
}

pub async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BusinessPatch>,
) -> ApiResult<Json<Business>> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(BlackCardError::Validation("name cannot be empty".into()));
    }
    Ok(Json(state.db.update_business(&id, &patch)?))
}

pub async fn delete_business(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    actor.require(|p| p.can_delete, "delete businesses")?;
    let business = state.db.require_business(&id)?;
    state.db.delete_business(&id)?;
    record(&state, &actor, ActivityDetails::BusinessDeleted { business_id: id, name: business.name });
    Ok(Json(json!({"deleted": true})))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Business>> {
    let status = OutreachStatus::parse(&req.status)
        .ok_or_else(|| BlackCardError::Validation(format!("Unknown outreach status '{}'", req.status)))?;
    let before = state.db.require_business(&id)?.outreach_status;
    let business = state.db.update_business_status(&id, status)?;
    record(&state, &actor, ActivityDetails::BusinessStatusChanged {
        business_id: id,
        from: before.as_str().to_string(),
        to: status.as_str().to_string(),
    });
    Ok(Json(business))
}

/// What the selector sees in a business, without generating any copy.
pub async fn get_signals(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let business = state.db.require_business(&id)?;
    let category = business.category_kind();
    let signals = detect_signals(&business);
    let offer = state.catalog.match_offer(category, &signals);
    Ok(Json(json!({
        "businessId": business.id,
        "category": category,
        "signals": signals,
        "offer": offer,
        "recommendedTier": tables::tier_for_signal_count(signals.len()),
    })))
}

async fn enrich_and_store(state: &AppState, business: &Business) -> ApiResult<EnrichmentOutcome> {
    let outcome = enrich_business(business, &state.catalog, state.llm.as_deref(), &state.retry).await;
    state.db.set_enrichment(&business.id, &outcome.enrichment)?;
    Ok(outcome)
}

pub async fn enrich_one(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    actor.require(|p| p.can_enrich, "enrich businesses")?;
    let business = state.db.require_business(&id)?;
    let outcome = enrich_and_store(&state, &business).await?;
    record(&state, &actor, ActivityDetails::BusinessEnriched {
        business_id: id.clone(),
        ai_score: outcome.enrichment.ai_score,
    });
    Ok(Json(json!({
        "business": state.db.require_business(&id)?,
        "source": outcome.source,
    })))
}

pub async fn enrich_batch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BatchEnrichRequest>,
) -> ApiResult<Json<BatchResponse>> {
    actor.require(|p| p.can_enrich, "enrich businesses")?;
    let businesses = select_businesses(&state, &req.selection)?;

    let mut processed = 0;
    let mut errors = 0;
    for business in businesses.iter().filter(|b| !req.only_missing || b.ai_score.is_none()) {
        processed += 1;
        if let Err(e) = enrich_and_store(&state, business).await {
            warn!(business_id = %business.id, error = %e, "Batch enrichment item failed");
            errors += 1;
        }
    }

    info!(processed, errors, "Batch enrichment finished");
    record(&state, &actor, ActivityDetails::BatchRun { operation: "enrich".into(), processed, errors });
    Ok(Json(BatchResponse::new("enrich", processed, errors, Vec::new())))
}
