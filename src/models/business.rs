use serde::{Deserialize, Serialize};

/// Hospitality vertical a business belongs to. Raw category labels coming
/// from scans or manual entry are normalized through [`Category::from_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Restaurant,
    Hotel,
    Hostel,
    Bar,
    Cafe,
    Spa,
    TourOperator,
    Nightclub,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Restaurant,
        Category::Hotel,
        Category::Hostel,
        Category::Bar,
        Category::Cafe,
        Category::Spa,
        Category::TourOperator,
        Category::Nightclub,
        Category::Other,
    ];

    /// Map a free-form label (English or Spanish, any case) to a category.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "restaurant" | "restaurante" | "restaurants" | "restaurantes" | "food" => Self::Restaurant,
            "hotel" | "hotels" | "hoteles" | "boutique_hotel" | "lodging" => Self::Hotel,
            "hostel" | "hostal" | "hostels" | "hostales" => Self::Hostel,
            "bar" | "bars" | "bares" | "pub" => Self::Bar,
            "cafe" | "café" | "coffee" | "coffee_shop" | "cafeteria" | "cafes" => Self::Cafe,
            "spa" | "spas" | "wellness" => Self::Spa,
            "tour_operator" | "tour" | "tours" | "travel_agency" | "agencia_de_viajes" => Self::TourOperator,
            "nightclub" | "night_club" | "discoteca" | "club" => Self::Nightclub,
            _ => Self::Other,
        }
    }

    /// Stored form of a category label: the canonical key for a known
    /// vertical, otherwise the caller's own label, trimmed and lower-cased.
    /// Offers still resolve unknown labels to `other`.
    pub fn normalize_label(label: &str) -> String {
        match Self::from_label(label) {
            Self::Other => label.trim().to_lowercase(),
            known => known.as_str().to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
            Self::Hostel => "hostel",
            Self::Bar => "bar",
            Self::Cafe => "cafe",
            Self::Spa => "spa",
            Self::TourOperator => "tour_operator",
            Self::Nightclub => "nightclub",
            Self::Other => "other",
        }
    }

    /// Human label used inside Spanish copy.
    pub fn label_es(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurante",
            Self::Hotel => "hotel",
            Self::Hostel => "hostal",
            Self::Bar => "bar",
            Self::Cafe => "café",
            Self::Spa => "spa",
            Self::TourOperator => "operador turístico",
            Self::Nightclub => "discoteca",
            Self::Other => "negocio",
        }
    }

    /// Human label used inside English copy.
    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
            Self::Hostel => "hostel",
            Self::Bar => "bar",
            Self::Cafe => "café",
            Self::Spa => "spa",
            Self::TourOperator => "tour operator",
            Self::Nightclub => "nightclub",
            Self::Other => "business",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a business is in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachStatus {
    #[default]
    Pending,
    Contacted,
    Responded,
    Converted,
    NotInterested,
}

impl OutreachStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Responded => "responded",
            Self::Converted => "converted",
            Self::NotInterested => "not_interested",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "contacted" => Some(Self::Contacted),
            "responded" => Some(Self::Responded),
            "converted" => Some(Self::Converted),
            "not_interested" => Some(Self::NotInterested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiReadiness {
    Low,
    Medium,
    High,
}

impl AiReadiness {
    pub fn from_score(score: i64) -> Self {
        if score >= 70 {
            Self::High
        } else if score >= 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A prospect discovered by a scan or entered by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    /// Average hours before the business answers a message; a proxy collected
    /// by the scanner or entered by a rep.
    pub response_time_hours: Option<f64>,
    pub place_id: Option<String>,
    pub scan_id: Option<String>,
    pub ai_score: Option<i64>,
    pub ai_readiness: Option<AiReadiness>,
    pub ai_summary: Option<String>,
    pub outreach_status: OutreachStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Business {
    pub fn category_kind(&self) -> Category {
        Category::from_label(&self.category)
    }

    /// Best number to reach the business on WhatsApp.
    pub fn whatsapp_number(&self) -> Option<&str> {
        self.whatsapp
            .as_deref()
            .or(self.phone.as_deref())
            .filter(|n| !n.trim().is_empty())
    }
}

/// Fields accepted when a business is created, by hand or from a places lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusiness {
    pub name: String,
    pub category: String,
    pub city: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub response_time_hours: Option<f64>,
    pub place_id: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub response_time_hours: Option<f64>,
    pub notes: Option<String>,
}

/// Query-string filters for listing businesses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFilter {
    pub city: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_score: Option<i64>,
    pub has_email: Option<bool>,
    pub has_website: Option<bool>,
    pub has_phone: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Enrichment result written back onto a business row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub ai_score: i64,
    pub ai_readiness: AiReadiness,
    pub ai_summary: String,
}
