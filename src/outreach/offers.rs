use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::LossOverride;
use crate::errors::BlackCardError;
use crate::models::Category;
use super::psychology::{Framework, Language};
use super::signals::Signal;
use super::tables::{self, LossRange, OfferRule};

/// An offer selected for a business, with the loss range after overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedOffer {
    pub category: Category,
    pub offer: String,
    pub loss: LossRange,
    pub framework: Framework,
    /// Signals the rule required; empty for the category default.
    pub matched_signals: Vec<Signal>,
    pub is_default: bool,
    pain_point_es: String,
    pain_point_en: String,
}

impl MatchedOffer {
    pub fn pain_point(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.pain_point_es,
            Language::En => &self.pain_point_en,
        }
    }
}

/// Offer tables plus the configured loss-range overrides. Built once at
/// start-up and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct OfferCatalog {
    overrides: Vec<(Category, String, LossRange)>,
}

impl OfferCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from config. Each must name an offer that exists in
    /// its category's table.
    pub fn with_overrides(overrides: &[LossOverride]) -> Result<Self, BlackCardError> {
        let mut catalog = Self::new();
        for o in overrides {
            let category = Category::from_label(&o.category);
            let profile = tables::profile(category);
            let known = profile
                .offers
                .iter()
                .chain(std::iter::once(&profile.default_offer))
                .any(|r| r.offer == o.offer);
            if !known {
                return Err(BlackCardError::Config(format!(
                    "Loss override references unknown offer '{}' for category '{}'",
                    o.offer, category
                )));
            }
            if o.min > o.max {
                return Err(BlackCardError::Config(format!(
                    "Loss override for '{}' has min {} greater than max {}",
                    o.offer, o.min, o.max
                )));
            }
            debug!(category = %category, offer = %o.offer, min = o.min, max = o.max, "Loss range override");
            catalog.overrides.push((category, o.offer.clone(), LossRange::new(o.min, o.max)));
        }
        Ok(catalog)
    }

    fn loss_for(&self, category: Category, rule: &OfferRule) -> LossRange {
        self.overrides
            .iter()
            .find(|(c, offer, _)| *c == category && offer == rule.offer)
            .map(|(_, _, range)| *range)
            .unwrap_or(rule.loss)
    }

    fn to_matched(&self, category: Category, rule: &'static OfferRule, is_default: bool) -> MatchedOffer {
        MatchedOffer {
            category,
            offer: rule.offer.to_string(),
            loss: self.loss_for(category, rule),
            framework: rule.framework,
            matched_signals: rule.requires.to_vec(),
            is_default,
            pain_point_es: rule.pain_es.to_string(),
            pain_point_en: rule.pain_en.to_string(),
        }
    }

    /// First rule of the category whose required signals all fired, else the
    /// category default. List order is the priority.
    pub fn match_offer(&self, category: Category, signals: &BTreeSet<Signal>) -> MatchedOffer {
        let profile = tables::profile(category);
        profile
            .offers
            .iter()
            .find(|rule| rule.requires.iter().all(|s| signals.contains(s)))
            .map(|rule| self.to_matched(category, rule, false))
            .unwrap_or_else(|| self.to_matched(category, &profile.default_offer, true))
    }

    /// Every matching rule in priority order, followed by the default when
    /// nothing matched.
    pub fn match_all(&self, category: Category, signals: &BTreeSet<Signal>) -> Vec<MatchedOffer> {
        let profile = tables::profile(category);
        let mut matched: Vec<MatchedOffer> = profile
            .offers
            .iter()
            .filter(|rule| rule.requires.iter().all(|s| signals.contains(s)))
            .map(|rule| self.to_matched(category, rule, false))
            .collect();
        if matched.is_empty() {
            matched.push(self.to_matched(category, &profile.default_offer, true));
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(list: &[Signal]) -> BTreeSet<Signal> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_restaurant_no_website_low_reviews() {
        let catalog = OfferCatalog::new();
        let m = catalog.match_offer(Category::Restaurant, &signals(&[Signal::NoWebsite, Signal::LowReviews]));
        assert_eq!(m.offer, "AI Booking Bot + Review Management System");
        assert_eq!(m.loss, LossRange::new(2000, 5000));
        assert!(m.loss.contains(2000) && m.loss.contains(5000));
        assert!(!m.is_default);
    }

    #[test]
    fn test_earlier_rule_wins_when_several_match() {
        let catalog = OfferCatalog::new();
        // low_reviews alone would match rule 3, no_website alone rule 4.
        let m = catalog.match_offer(
            Category::Restaurant,
            &signals(&[Signal::NoWebsite, Signal::LowReviews, Signal::SlowResponse]),
        );
        assert_eq!(m.offer, "AI Booking Bot + Review Management System");
    }

    #[test]
    fn test_subset_requirement() {
        let catalog = OfferCatalog::new();
        let m = catalog.match_offer(Category::Restaurant, &signals(&[Signal::LowReviews]));
        assert_eq!(m.offer, "Automated Review Generation System");
        assert_eq!(m.framework, Framework::SocialProof);
    }

    #[test]
    fn test_no_signals_falls_back_to_default() {
        let catalog = OfferCatalog::new();
        let m = catalog.match_offer(Category::Hotel, &BTreeSet::new());
        assert!(m.is_default);
        assert_eq!(m.offer, "AI Guest Experience Automation");
        assert!(m.matched_signals.is_empty());
    }

    #[test]
    fn test_match_all_preserves_priority_order() {
        let catalog = OfferCatalog::new();
        let all = catalog.match_all(Category::Restaurant, &signals(&[Signal::NoWebsite, Signal::LowReviews]));
        let names: Vec<&str> = all.iter().map(|m| m.offer.as_str()).collect();
        assert_eq!(names, vec![
            "AI Booking Bot + Review Management System",
            "Automated Review Generation System",
            "AI-Powered Website + Online Booking",
        ]);
    }

    #[test]
    fn test_override_replaces_loss_range() {
        let catalog = OfferCatalog::with_overrides(&[LossOverride {
            category: "restaurante".into(),
            offer: "AI Booking Bot + Review Management System".into(),
            min: 2500,
            max: 6000,
        }]).unwrap();
        let m = catalog.match_offer(Category::Restaurant, &signals(&[Signal::NoWebsite, Signal::LowReviews]));
        assert_eq!(m.loss, LossRange::new(2500, 6000));

        // Other categories keep their literals.
        let h = catalog.match_offer(Category::Hotel, &signals(&[Signal::OtaDependent]));
        assert_eq!(h.loss, LossRange::new(3000, 8000));
    }

    #[test]
    fn test_override_unknown_offer_rejected() {
        let result = OfferCatalog::with_overrides(&[LossOverride {
            category: "hotel".into(),
            offer: "Teleportation".into(),
            min: 1,
            max: 2,
        }]);
        assert!(matches!(result, Err(BlackCardError::Config(_))));
    }

    #[test]
    fn test_override_inverted_range_rejected() {
        let result = OfferCatalog::with_overrides(&[LossOverride {
            category: "hotel".into(),
            offer: "AI Guest Experience Automation".into(),
            min: 9000,
            max: 100,
        }]);
        assert!(result.is_err());
    }
}
