use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanRequest {
    pub city: String,
    pub category: String,
    pub limit: Option<usize>,
    /// Score every business the scan finds.
    #[serde(default)]
    pub enrich: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScanRequest {
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub enrich: bool,
}

/// Which businesses a batch operation walks over. Explicit ids win over
/// the filters.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchSelection {
    pub business_ids: Option<Vec<String>>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnrichRequest {
    #[serde(flatten)]
    pub selection: BatchSelection,
    /// Skip businesses that already have a score.
    #[serde(default)]
    pub only_missing: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutreachRequest {
    pub business_id: String,
    pub tone: Option<String>,
    pub language: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutreachRequest {
    #[serde(flatten)]
    pub selection: BatchSelection,
    pub tone: Option<String>,
    pub language: Option<String>,
    /// Skip businesses that already have a campaign.
    #[serde(default)]
    pub skip_existing: bool,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub tone: Option<String>,
    pub language: Option<String>,
}

/// Aggregate result of a batch endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub processed: usize,
    pub succeeded: usize,
    pub errors: usize,
    pub message: String,
    /// Ids of rows created by the run, when the operation creates any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created_ids: Vec<String>,
}

impl BatchResponse {
    pub fn new(operation: &str, processed: usize, errors: usize, created_ids: Vec<String>) -> Self {
        let succeeded = processed - errors;
        Self {
            processed,
            succeeded,
            errors,
            message: format!("{}: {} processed, {} succeeded, {} failed", operation, processed, succeeded, errors),
            created_ids,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionRequest {
    pub text: String,
    pub language: Option<String>,
    pub business_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: String,
    pub business_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlackCardRequest {
    pub language: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationRequest {
    pub code: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkVerifyRequest {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdateRequest {
    pub role: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    pub city: Option<String>,
}
