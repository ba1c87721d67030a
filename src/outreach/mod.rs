//! Outreach content selection: business record -> signals -> offer -> messages.

pub mod offers;
pub mod psychology;
pub mod render;
pub mod signals;
pub mod tables;

pub use offers::{MatchedOffer, OfferCatalog};
pub use psychology::{Framework, Language};
pub use render::{render, OutreachMessages, RenderInput, Sender};
pub use signals::{detect_signals, Signal};

use serde::{Deserialize, Serialize};
use crate::errors::BlackCardError;
use crate::models::Business;
use tables::{ObjectionKind, PricingTier, TicketRange};

/// Output of one generation: what was detected, what was chosen, what to send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachPackage {
    pub business_id: String,
    pub signals: Vec<Signal>,
    pub offer: MatchedOffer,
    pub messages: OutreachMessages,
}

/// Resolve the caller's tone into a framework. `None` or an empty string
/// defers to the framework recommended by the matched offer.
pub fn resolve_framework(tone: Option<&str>, offer: &MatchedOffer) -> Result<Framework, BlackCardError> {
    match tone.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(offer.framework),
        Some(t) => Framework::from_tone(t)
            .ok_or_else(|| BlackCardError::Validation(format!("Unknown tone '{}'", t))),
    }
}

pub fn resolve_language(language: Option<&str>, fallback: Language) -> Result<Language, BlackCardError> {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(fallback),
        Some(l) => Language::parse(l)
            .ok_or_else(|| BlackCardError::Validation(format!("Unsupported language '{}'", l))),
    }
}

/// Run the whole selector for one business.
pub fn generate(
    catalog: &OfferCatalog,
    business: &Business,
    tone: Option<&str>,
    language: Language,
    sender: &Sender,
) -> Result<OutreachPackage, BlackCardError> {
    let signals = detect_signals(business);
    let offer = catalog.match_offer(business.category_kind(), &signals);
    let framework = resolve_framework(tone, &offer)?;
    let messages = render(&RenderInput {
        business,
        offer: &offer,
        framework,
        language,
        sender,
    });
    Ok(OutreachPackage {
        business_id: business.id.clone(),
        signals: signals.into_iter().collect(),
        offer,
        messages,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionResponse {
    pub kind: ObjectionKind,
    pub script: String,
}

/// The "Black Card" dossier: every matching offer, pricing, angles, objection
/// scripts and the message set under every framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackCardPackage {
    pub business_id: String,
    pub language: Language,
    pub signals: Vec<Signal>,
    pub primary_offer: MatchedOffer,
    pub offers: Vec<MatchedOffer>,
    pub ticket: TicketRange,
    pub recommended_tier: PricingTier,
    pub automations: Vec<String>,
    pub hooks: Vec<String>,
    pub objections: Vec<ObjectionResponse>,
    pub messages: Vec<OutreachMessages>,
}

pub fn build_black_card(
    catalog: &OfferCatalog,
    business: &Business,
    language: Language,
    sender: &Sender,
) -> BlackCardPackage {
    let category = business.category_kind();
    let profile = tables::profile(category);
    let signals = detect_signals(business);
    let offers = catalog.match_all(category, &signals);
    let primary_offer = catalog.match_offer(category, &signals);

    let messages = Framework::ALL
        .iter()
        .map(|&framework| {
            render(&RenderInput {
                business,
                offer: &primary_offer,
                framework,
                language,
                sender,
            })
        })
        .collect();

    let objections = tables::OBJECTIONS
        .iter()
        .map(|script| ObjectionResponse {
            kind: script.kind,
            script: objection_script(script, business, &primary_offer, language, sender),
        })
        .collect();

    BlackCardPackage {
        business_id: business.id.clone(),
        language,
        recommended_tier: tables::tier_for_signal_count(signals.len()).clone(),
        signals: signals.into_iter().collect(),
        offers,
        ticket: profile.ticket,
        automations: profile.automations.iter().map(|a| a.to_string()).collect(),
        hooks: profile.hooks(language).iter().map(|h| h.to_string()).collect(),
        objections,
        messages,
        primary_offer,
    }
}

/// Fill an objection script with the same variables the message templates use.
pub fn objection_script(
    script: &tables::ObjectionScript,
    business: &Business,
    offer: &MatchedOffer,
    language: Language,
    sender: &Sender,
) -> String {
    let category = business.category_kind();
    let category_label = match language {
        Language::Es => category.label_es(),
        Language::En => category.label_en(),
    };
    let loss_min = crate::utils::formatting::format_usd(offer.loss.min, language);
    let loss_max = crate::utils::formatting::format_usd(offer.loss.max, language);
    render::fill(
        script.response(language),
        &[
            ("business_name", business.name.as_str()),
            ("city", business.city.as_str()),
            ("category", category_label),
            ("offer", offer.offer.as_str()),
            ("loss_min", loss_min.as_str()),
            ("loss_max", loss_max.as_str()),
            ("pain_point", offer.pain_point(language)),
            ("sender_name", sender.name.as_str()),
            ("sender_company", sender.company.as_str()),
        ],
    )
}
