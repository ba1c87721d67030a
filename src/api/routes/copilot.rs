use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;
use crate::api::models::{AskRequest, ObjectionRequest};
use crate::api::AppState;
use crate::errors::{with_retry, BlackCardError};
use crate::models::Business;
use crate::outreach::{detect_signals, objection_script, resolve_language, tables, ObjectionResponse};
use super::ApiResult;

const COPILOT_SYSTEM: &str = "You are a sales copilot for an agency that sells AI automation \
to hospitality businesses in Colombia. Answer briefly and concretely. Reply in the language \
of the question.";

/// Classify a prospect's reply and return the script for it. Without a
/// business the placeholders for business fields render empty.
pub async fn objection(
    State(state): State<AppState>,
    Json(req): Json<ObjectionRequest>,
) -> ApiResult<Json<ObjectionResponse>> {
    if req.text.trim().is_empty() {
        return Err(BlackCardError::Validation("text is required".into()));
    }
    let language = resolve_language(req.language.as_deref(), state.language()?)?;
    let business = match req.business_id.as_deref() {
        Some(id) => state.db.require_business(id)?,
        None => Business::default(),
    };
    let offer = state.catalog.match_offer(business.category_kind(), &detect_signals(&business));
    let script = tables::classify_objection(&req.text);
    Ok(Json(ObjectionResponse {
        kind: script.kind,
        script: objection_script(script, &business, &offer, language, &state.sender()?),
    }))
}

fn business_context(business: &Business) -> String {
    let signals: Vec<&str> = detect_signals(business).iter().map(|s| s.as_str()).collect();
    let mut ctx = format!(
        "Business: {} ({}) in {}\nSignals: {}\n",
        business.name,
        business.category,
        business.city,
        if signals.is_empty() { "none".to_string() } else { signals.join(", ") },
    );
    if let Some(rating) = business.rating {
        ctx.push_str(&format!("Rating: {} ({} reviews)\n", rating, business.review_count.unwrap_or(0)));
    }
    if let Some(summary) = business.ai_summary.as_deref() {
        ctx.push_str(&format!("Summary: {}\n", summary));
    }
    ctx
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<Value>> {
    let llm = state.llm.as_deref().ok_or(BlackCardError::LLMUnavailable)?;
    if req.question.trim().is_empty() {
        return Err(BlackCardError::Validation("question is required".into()));
    }

    let prompt = match req.business_id.as_deref() {
        Some(id) => {
            let business = state.db.require_business(id)?;
            format!("{}\nQuestion: {}", business_context(&business), req.question)
        }
        None => req.question.clone(),
    };
    let prompt = prompt.as_str();

    let response = with_retry("copilot_ask", &state.retry, move || llm.complete(prompt, Some(COPILOT_SYSTEM))).await?;
    info!(
        provider = llm.provider_name(),
        input_tokens = ?response.input_tokens,
        output_tokens = ?response.output_tokens,
        "Copilot answered"
    );
    Ok(Json(json!({ "answer": response.content, "model": response.model })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_context_lists_signals() {
        let b = Business {
            name: "Hostal Mar".into(),
            category: "hostel".into(),
            city: "Santa Marta".into(),
            rating: Some(3.9),
            review_count: Some(4),
            ..Default::default()
        };
        let ctx = business_context(&b);
        assert!(ctx.starts_with("Business: Hostal Mar (hostel) in Santa Marta"));
        assert!(ctx.contains("no_website"));
        assert!(ctx.contains("Rating: 3.9 (4 reviews)"));
    }
}
