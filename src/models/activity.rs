use serde::{Deserialize, Serialize};

/// What happened, with the fields each action actually records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDetails {
    ScanCompleted { scan_id: String, total_found: i64 },
    BusinessEnriched { business_id: String, ai_score: i64 },
    BusinessStatusChanged { business_id: String, from: String, to: String },
    BusinessDeleted { business_id: String, name: String },
    CampaignGenerated { campaign_id: String, business_id: String, framework: String },
    CampaignStatusChanged { campaign_id: String, from: String, to: String },
    BlackCardGenerated { business_id: String, offers: usize },
    BatchRun { operation: String, processed: usize, errors: usize },
    UserJoined { email: String, role: String },
    Login { method: String },
    RoleChanged { user_id: String, role: String },
    InvitationCreated { email: String, role: String },
}

impl ActivityDetails {
    pub fn action(&self) -> &'static str {
        match self {
            Self::ScanCompleted { .. } => "scan_completed",
            Self::BusinessEnriched { .. } => "business_enriched",
            Self::BusinessStatusChanged { .. } => "business_status_changed",
            Self::BusinessDeleted { .. } => "business_deleted",
            Self::CampaignGenerated { .. } => "campaign_generated",
            Self::CampaignStatusChanged { .. } => "campaign_status_changed",
            Self::BlackCardGenerated { .. } => "blackcard_generated",
            Self::BatchRun { .. } => "batch_run",
            Self::UserJoined { .. } => "user_joined",
            Self::Login { .. } => "login",
            Self::RoleChanged { .. } => "role_changed",
            Self::InvitationCreated { .. } => "invitation_created",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub details: ActivityDetails,
    pub created_at: String,
}
