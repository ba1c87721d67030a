use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::api::auth::Actor;
use crate::api::models::{BatchOutreachRequest, BatchResponse, GenerateOutreachRequest, PreviewQuery, StatusUpdateRequest};
use crate::api::AppState;
use crate::errors::BlackCardError;
use crate::models::{ActivityDetails, Business, CampaignFilter, CampaignStatus, OutreachCampaign};
use crate::outreach::{generate, resolve_language, Framework, Language, OutreachPackage, Sender};
use super::businesses::{record, select_businesses};
use super::ApiResult;

/// Generate and persist one campaign as a draft.
fn generate_and_store(
    state: &AppState,
    actor: &Actor,
    business: &Business,
    tone: Option<&str>,
    language: Language,
    sender: &Sender,
) -> ApiResult<(OutreachPackage, OutreachCampaign)> {
    let package = generate(&state.catalog, business, tone, language, sender)?;
    let campaign = state.db.create_campaign(&package, actor.user_id())?;
    record(state, actor, ActivityDetails::CampaignGenerated {
        campaign_id: campaign.id.clone(),
        business_id: business.id.clone(),
        framework: package.messages.framework.to_string(),
    });
    Ok((package, campaign))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(filter): Query<CampaignFilter>,
) -> ApiResult<Json<Value>> {
    if let Some(status) = filter.status.as_deref() {
        if CampaignStatus::parse(status).is_none() {
            return Err(BlackCardError::Validation(format!("Unknown campaign status '{}'", status)));
        }
    }
    let campaigns = state.db.list_campaigns(&filter)?;
    Ok(Json(json!({ "campaigns": campaigns, "total": campaigns.len() })))
}

pub async fn generate_campaign(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<GenerateOutreachRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    actor.require(|p| p.can_generate_outreach, "generate outreach")?;
    let business = state.db.require_business(&req.business_id)?;
    let language = resolve_language(req.language.as_deref(), state.language()?)?;
    let sender = state.sender()?;

    let (package, campaign) = generate_and_store(&state, &actor, &business, req.tone.as_deref(), language, &sender)?;
    info!(
        campaign_id = %campaign.id,
        business_id = %business.id,
        framework = %package.messages.framework,
        offer = %package.offer.offer,
        "Campaign generated"
    );
    Ok((StatusCode::CREATED, Json(json!({
        "campaign": campaign,
        "signals": package.signals,
        "offer": package.offer,
    }))))
}

/// Render without persisting.
pub async fn preview(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Json<OutreachPackage>> {
    let business = state.db.require_business(&business_id)?;
    let language = resolve_language(query.language.as_deref(), state.language()?)?;
    let package = generate(&state.catalog, &business, query.tone.as_deref(), language, &state.sender()?)?;
    Ok(Json(package))
}

pub async fn batch_generate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BatchOutreachRequest>,
) -> ApiResult<Json<BatchResponse>> {
    actor.require(|p| p.can_generate_outreach, "generate outreach")?;
    // Bad tone or language fails the whole request, not every item.
    let language = resolve_language(req.language.as_deref(), state.language()?)?;
    if let Some(tone) = req.tone.as_deref().filter(|t| !t.trim().is_empty()) {
        if Framework::from_tone(tone).is_none() {
            return Err(BlackCardError::Validation(format!("Unknown tone '{}'", tone)));
        }
    }
    let sender = state.sender()?;
    let businesses = select_businesses(&state, &req.selection)?;

    let mut processed = 0;
    let mut errors = 0;
    let mut created = Vec::new();
    for business in &businesses {
        if req.skip_existing {
            let existing = state.db.list_campaigns(&CampaignFilter {
                business_id: Some(business.id.clone()),
                limit: Some(1),
                ..Default::default()
            })?;
            if !existing.is_empty() {
                continue;
            }
        }
        processed += 1;
        match generate_and_store(&state, &actor, business, req.tone.as_deref(), language, &sender) {
            Ok((_, campaign)) => created.push(campaign.id),
            Err(e) => {
                warn!(business_id = %business.id, error = %e, "Batch outreach item failed");
                errors += 1;
            }
        }
    }

    info!(processed, errors, created = created.len(), "Batch outreach finished");
    record(&state, &actor, ActivityDetails::BatchRun { operation: "outreach".into(), processed, errors });
    Ok(Json(BatchResponse::new("outreach", processed, errors, created)))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OutreachCampaign>> {
    state.db.get_campaign(&id)?
        .map(Json)
        .ok_or_else(|| BlackCardError::NotFound(format!("Campaign {}", id)))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    actor.require(|p| p.can_delete, "delete campaigns")?;
    if !state.db.delete_campaign(&id)? {
        return Err(BlackCardError::NotFound(format!("Campaign {}", id)));
    }
    Ok(Json(json!({"deleted": true})))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<OutreachCampaign>> {
    let status = CampaignStatus::parse(&req.status)
        .ok_or_else(|| BlackCardError::Validation(format!("Unknown campaign status '{}'", req.status)))?;
    let (previous, campaign) = state.db.update_campaign_status(&id, status)?;
    if previous.skips_stage(status) {
        warn!(campaign_id = %id, from = previous.as_str(), to = status.as_str(), "Campaign status skipped a stage");
    }
    record(&state, &actor, ActivityDetails::CampaignStatusChanged {
        campaign_id: id,
        from: previous.as_str().to_string(),
        to: status.as_str().to_string(),
    });
    Ok(Json(campaign))
}
