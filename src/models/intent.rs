use serde::{Deserialize, Serialize};

/// Kind-specific payload of an intent signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntentDetails {
    Hiring {
        role: String,
        posting_url: Option<String>,
    },
    NegativeReview {
        rating: f64,
        excerpt: String,
        platform: Option<String>,
    },
    NewOpening {
        opening_date: Option<String>,
    },
    Expansion {
        new_locations: Option<i64>,
    },
    OwnershipChange {
        note: Option<String>,
    },
    Other {
        note: Option<String>,
    },
}

impl IntentDetails {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hiring { .. } => "hiring",
            Self::NegativeReview { .. } => "negative_review",
            Self::NewOpening { .. } => "new_opening",
            Self::Expansion { .. } => "expansion",
            Self::OwnershipChange { .. } => "ownership_change",
            Self::Other { .. } => "other",
        }
    }
}

/// A scraped or hand-entered buying signal. Associated with businesses by
/// city/category at query time, never by foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSignal {
    pub id: String,
    pub city: String,
    pub category: Option<String>,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub strength: i64,
    pub details: IntentDetails,
    pub detected_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIntentSignal {
    pub city: String,
    pub category: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub strength: Option<i64>,
    pub details: IntentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentFilter {
    pub city: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub city: String,
    pub venue: Option<String>,
    pub starts_at: String,
    pub expected_attendance: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub city: String,
    pub venue: Option<String>,
    pub starts_at: String,
    pub expected_attendance: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueMonitor {
    pub id: String,
    pub name: String,
    pub city: String,
    pub category: Option<String>,
    pub url: String,
    pub active: bool,
    pub last_checked_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVenueMonitor {
    pub name: String,
    pub city: String,
    pub category: Option<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_tagged_by_type() {
        let details: IntentDetails = serde_json::from_value(json!({
            "type": "negative_review",
            "rating": 2.0,
            "excerpt": "Nunca contestan el WhatsApp",
            "platform": "google"
        })).unwrap();
        assert_eq!(details.kind(), "negative_review");
    }

    #[test]
    fn test_details_unknown_type_rejected() {
        let result: Result<IntentDetails, _> = serde_json::from_value(json!({"type": "lottery"}));
        assert!(result.is_err());
    }
}
