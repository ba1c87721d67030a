use serde::{Deserialize, Serialize};
use crate::outreach::BlackCardPackage;

/// Lifecycle of a generated message set. The usual path is
/// `draft -> ready -> sent -> responded -> converted`, with `rejected` and
/// `archived` as side exits. Transitions are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Ready,
    Sent,
    Responded,
    Converted,
    Rejected,
    Archived,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Sent => "sent",
            Self::Responded => "responded",
            Self::Converted => "converted",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "ready" => Some(Self::Ready),
            "sent" => Some(Self::Sent),
            "responded" => Some(Self::Responded),
            "converted" => Some(Self::Converted),
            "rejected" => Some(Self::Rejected),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Position on the main path, `None` for the side exits.
    fn stage(&self) -> Option<u8> {
        match self {
            Self::Draft => Some(0),
            Self::Ready => Some(1),
            Self::Sent => Some(2),
            Self::Responded => Some(3),
            Self::Converted => Some(4),
            Self::Rejected | Self::Archived => None,
        }
    }

    /// True when moving from `self` to `next` jumps over a stage of the main
    /// path (e.g. `ready -> converted` without ever being `sent`).
    pub fn skips_stage(&self, next: CampaignStatus) -> bool {
        match (self.stage(), next.stage()) {
            (Some(from), Some(to)) => to > from + 1,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUps {
    pub day3: String,
    pub day7: String,
    pub day14: String,
}

/// One persisted outreach message set for one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachCampaign {
    pub id: String,
    pub business_id: String,
    pub user_id: Option<String>,
    pub status: CampaignStatus,
    pub framework: String,
    pub language: String,
    pub offer: String,
    pub loss_min: i64,
    pub loss_max: i64,
    pub signals: Vec<String>,
    pub whatsapp_script: String,
    pub whatsapp_link: String,
    pub instagram_dm: String,
    pub email_subject: String,
    pub email_body: String,
    pub follow_ups: FollowUps,
    pub created_at: String,
    pub updated_at: String,
    pub sent_at: Option<String>,
    pub responded_at: Option<String>,
    pub converted_at: Option<String>,
}

/// A stored Black Card package, exactly as it was generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimateOutreach {
    pub id: String,
    pub business_id: String,
    pub user_id: Option<String>,
    pub language: String,
    pub package: BlackCardPackage,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFilter {
    pub status: Option<String>,
    pub business_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for s in ["draft", "ready", "sent", "responded", "converted", "rejected", "archived"] {
            assert_eq!(CampaignStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(CampaignStatus::parse("deleted").is_none());
    }

    #[test]
    fn test_skips_stage_detects_jump_to_converted() {
        assert!(CampaignStatus::Ready.skips_stage(CampaignStatus::Converted));
        assert!(CampaignStatus::Draft.skips_stage(CampaignStatus::Sent));
        assert!(!CampaignStatus::Sent.skips_stage(CampaignStatus::Responded));
        assert!(!CampaignStatus::Converted.skips_stage(CampaignStatus::Draft));
        assert!(!CampaignStatus::Draft.skips_stage(CampaignStatus::Archived));
    }
}
