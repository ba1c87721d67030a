//! Read-only views of the reference tables for the dashboard.

use axum::{extract::Path, Json};
use serde_json::{json, Value};
use crate::models::Category;
use crate::outreach::psychology::FRAMEWORKS;
use crate::outreach::tables::{self, OBJECTIONS, PRICING_TIERS};

pub async fn categories() -> Json<Value> {
    let list: Vec<Value> = Category::ALL
        .iter()
        .map(|&c| {
            let profile = tables::profile(c);
            json!({
                "id": c,
                "labelEs": c.label_es(),
                "labelEn": c.label_en(),
                "ticket": profile.ticket,
                "automations": profile.automations,
            })
        })
        .collect();
    Json(json!({ "categories": list }))
}

pub async fn frameworks() -> Json<Value> {
    Json(json!({ "frameworks": &FRAMEWORKS[..] }))
}

pub async fn objections() -> Json<Value> {
    Json(json!({ "objections": &OBJECTIONS[..] }))
}

/// Offer table for one category. Unknown labels resolve to `other`.
pub async fn offers(Path(category): Path<String>) -> Json<Value> {
    let category = Category::from_label(&category);
    let profile = tables::profile(category);
    Json(json!({
        "category": category,
        "offers": profile.offers,
        "defaultOffer": &profile.default_offer,
        "hooksEs": profile.hooks_es,
        "hooksEn": profile.hooks_en,
        "pricingTiers": &PRICING_TIERS[..],
    }))
}
