use std::path::Path;
use crate::cli::commands::PreviewArgs;
use crate::errors::BlackCardError;
use crate::models::{Business, NewBusiness};
use crate::outreach::{build_black_card, generate, resolve_language, Language, OfferCatalog, Sender};

/// Read a business from JSON. Accepts either a full stored record or just
/// the fields used to create one.
pub fn load_business(content: &str) -> Result<Business, BlackCardError> {
    if let Ok(business) = serde_json::from_str::<Business>(content) {
        return Ok(business);
    }
    let new: NewBusiness = serde_json::from_str(content)?;
    Ok(Business {
        id: "preview".to_string(),
        name: new.name,
        category: new.category,
        city: new.city,
        address: new.address,
        phone: new.phone,
        whatsapp: new.whatsapp,
        email: new.email,
        website: new.website,
        instagram: new.instagram,
        rating: new.rating,
        review_count: new.review_count,
        response_time_hours: new.response_time_hours,
        place_id: new.place_id,
        notes: new.notes,
        ..Default::default()
    })
}

pub async fn handle_preview(args: PreviewArgs) -> Result<(), BlackCardError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let outreach = config.outreach();
    let catalog = OfferCatalog::with_overrides(&outreach.loss_overrides)?;
    let fallback = Sender::default();
    let sender = Sender {
        name: outreach.sender_name.unwrap_or(fallback.name),
        company: outreach.sender_company.unwrap_or(fallback.company),
    };
    let language = resolve_language(Some(&args.language), Language::Es)?;

    let content = tokio::fs::read_to_string(Path::new(&args.business)).await?;
    let business = load_business(&content)?;

    let output = if args.blackcard {
        serde_json::to_string_pretty(&build_black_card(&catalog, &business, language, &sender))?
    } else {
        serde_json::to_string_pretty(&generate(&catalog, &business, args.tone.as_deref(), language, &sender)?)?
    };
    println!("{}", output);
    Ok(())
}
