use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use crate::api::auth::Actor;
use crate::api::models::BlackCardRequest;
use crate::api::AppState;
use crate::errors::BlackCardError;
use crate::models::{ActivityDetails, UltimateOutreach};
use crate::outreach::{build_black_card, resolve_language};
use super::businesses::record;
use super::ApiResult;

/// Most recent stored package for a business.
pub async fn get_package(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> ApiResult<Json<UltimateOutreach>> {
    state.db.require_business(&business_id)?;
    state.db.latest_black_card(&business_id)?
        .map(Json)
        .ok_or_else(|| BlackCardError::NotFound(format!("Black Card package for business {}", business_id)))
}

pub async fn generate_package(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(business_id): Path<String>,
    body: Option<Json<BlackCardRequest>>,
) -> ApiResult<(StatusCode, Json<UltimateOutreach>)> {
    actor.require(|p| p.can_generate_outreach, "generate outreach")?;
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let business = state.db.require_business(&business_id)?;
    let language = resolve_language(req.language.as_deref(), state.language()?)?;

    let package = build_black_card(&state.catalog, &business, language, &state.sender()?);
    let stored = state.db.save_black_card(&package, actor.user_id())?;
    tracing::info!(business_id = %business_id, offers = package.offers.len(), "Black Card package generated");
    record(&state, &actor, ActivityDetails::BlackCardGenerated {
        business_id,
        offers: package.offers.len(),
    });
    Ok((StatusCode::CREATED, Json(stored)))
}
