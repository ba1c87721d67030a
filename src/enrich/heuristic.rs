use std::collections::BTreeSet;
use crate::models::{AiReadiness, Business, Enrichment};
use crate::outreach::{MatchedOffer, Signal};
use crate::utils::truncation::truncate_summary;

const BASE_SCORE: i64 = 20;

/// Points each signal adds to the opportunity score. Gaps in the digital
/// presence weigh most; a strong reputation means volume worth automating.
fn signal_weight(signal: Signal) -> i64 {
    match signal {
        Signal::NoWebsite => 25,
        Signal::OtaDependent => 20,
        Signal::LowReviews => 15,
        Signal::SocialOnly => 15,
        Signal::SlowResponse => 15,
        Signal::ManualBooking => 10,
        Signal::StrongReputation => 10,
    }
}

/// 0-100 opportunity score from the fired signals and how active the
/// business looks.
pub fn score(business: &Business, signals: &BTreeSet<Signal>) -> i64 {
    let mut score = BASE_SCORE + signals.iter().map(|s| signal_weight(*s)).sum::<i64>();

    match business.review_count.unwrap_or(0) {
        n if n >= 200 => score += 10,
        n if n >= 50 => score += 5,
        _ => {}
    }
    let reachable = business.whatsapp_number().is_some()
        || business.email.as_deref().is_some_and(|e| !e.trim().is_empty());
    if !reachable {
        score -= 15;
    }

    score.clamp(0, 100)
}

pub fn summary(business: &Business, signals: &BTreeSet<Signal>, offer: &MatchedOffer) -> String {
    let found = if signals.is_empty() {
        "sin brechas evidentes".to_string()
    } else {
        signals.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    };
    let rating = match (business.rating, business.review_count) {
        (Some(r), Some(n)) => format!("{:.1} estrellas en {} reseñas", r, n),
        (Some(r), None) => format!("{:.1} estrellas", r),
        _ => "sin calificación".to_string(),
    };
    truncate_summary(&format!(
        "{} ({}, {}): {}. Señales: {}. Oferta sugerida: {} (pérdida estimada USD {}-{}/mes).",
        business.name,
        business.category_kind().label_es(),
        business.city,
        rating,
        found,
        offer.offer,
        offer.loss.min,
        offer.loss.max,
    ))
}

pub fn enrich(business: &Business, signals: &BTreeSet<Signal>, offer: &MatchedOffer) -> Enrichment {
    let ai_score = score(business, signals);
    Enrichment {
        ai_score,
        ai_readiness: AiReadiness::from_score(ai_score),
        ai_summary: summary(business, signals, offer),
    }
}
