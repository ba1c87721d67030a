use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::models::Business;

/// Named fact derived from a business record. Declaration order is the
/// order signals are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    NoWebsite,
    LowReviews,
    OtaDependent,
    SocialOnly,
    ManualBooking,
    SlowResponse,
    StrongReputation,
}

impl Signal {
    pub const ALL: [Signal; 7] = [
        Signal::NoWebsite,
        Signal::LowReviews,
        Signal::OtaDependent,
        Signal::SocialOnly,
        Signal::ManualBooking,
        Signal::SlowResponse,
        Signal::StrongReputation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoWebsite => "no_website",
            Self::LowReviews => "low_reviews",
            Self::OtaDependent => "ota_dependent",
            Self::SocialOnly => "social_only",
            Self::ManualBooking => "manual_booking",
            Self::SlowResponse => "slow_response",
            Self::StrongReputation => "strong_reputation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sig| sig.as_str() == s)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const LOW_RATING_THRESHOLD: f64 = 4.0;
pub const LOW_REVIEW_COUNT: i64 = 10;
pub const SLOW_RESPONSE_HOURS: f64 = 4.0;
pub const STRONG_RATING: f64 = 4.5;
pub const STRONG_REVIEW_COUNT: i64 = 100;

/// Booking platforms that take a commission on every reservation.
const OTA_HOSTS: &[&str] = &[
    "booking.com",
    "airbnb.",
    "expedia.",
    "tripadvisor.",
    "despegar.com",
    "hostelworld.com",
    "rappi.com",
];

/// Pages that are not a site the business controls.
const SOCIAL_HOSTS: &[&str] = &[
    "instagram.com",
    "facebook.com",
    "fb.com",
    "linktr.ee",
    "wa.me",
    "tiktok.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebPresence {
    None,
    Ota,
    Social,
    Own,
}

fn host_of(website: &str) -> Option<String> {
    let trimmed = website.trim();
    let parsed = reqwest::Url::parse(trimmed)
        .or_else(|_| reqwest::Url::parse(&format!("https://{}", trimmed)))
        .ok()?;
    parsed.host_str().map(|h| h.trim_start_matches("www.").to_lowercase())
}

fn web_presence(website: Option<&str>) -> WebPresence {
    let Some(site) = website.filter(|w| !w.trim().is_empty()) else {
        return WebPresence::None;
    };
    let host = host_of(site).unwrap_or_else(|| site.trim().to_lowercase());
    if OTA_HOSTS.iter().any(|ota| host.contains(ota)) {
        WebPresence::Ota
    } else if SOCIAL_HOSTS.iter().any(|s| host == *s || host.ends_with(&format!(".{}", s))) {
        WebPresence::Social
    } else {
        WebPresence::Own
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}

/// Run every signal rule over a business. Multiple signals may fire; no
/// priority is resolved here.
pub fn detect_signals(business: &Business) -> BTreeSet<Signal> {
    let mut signals = BTreeSet::new();
    let presence = web_presence(business.website.as_deref());
    let review_count = business.review_count.unwrap_or(0);

    if presence == WebPresence::None {
        signals.insert(Signal::NoWebsite);
    }

    let low_rating = business.rating.map_or(false, |r| r < LOW_RATING_THRESHOLD);
    if low_rating || review_count < LOW_REVIEW_COUNT {
        signals.insert(Signal::LowReviews);
    }

    match presence {
        WebPresence::Ota => {
            signals.insert(Signal::OtaDependent);
        }
        WebPresence::Social => {
            signals.insert(Signal::SocialOnly);
        }
        _ => {}
    }

    let reachable_by_phone = has_text(business.phone.as_deref()) || has_text(business.whatsapp.as_deref());
    if reachable_by_phone && presence != WebPresence::Own {
        signals.insert(Signal::ManualBooking);
    }

    if business.response_time_hours.map_or(false, |h| h > SLOW_RESPONSE_HOURS) {
        signals.insert(Signal::SlowResponse);
    }

    if business.rating.map_or(false, |r| r >= STRONG_RATING) && review_count >= STRONG_REVIEW_COUNT {
        signals.insert(Signal::StrongReputation);
    }

    signals
}
