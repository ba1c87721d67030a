use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    TeamMember,
    Rep,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::TeamMember => "team_member",
            Self::Rep => "rep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "team_member" => Some(Self::TeamMember),
            "rep" => Some(Self::Rep),
            _ => None,
        }
    }

    pub fn permissions(&self) -> Permissions {
        match self {
            Self::Admin => Permissions {
                can_scan: true,
                can_enrich: true,
                can_generate_outreach: true,
                can_manage_team: true,
                can_delete: true,
            },
            Self::TeamMember => Permissions {
                can_scan: true,
                can_enrich: true,
                can_generate_outreach: true,
                can_manage_team: false,
                can_delete: false,
            },
            Self::Rep => Permissions {
                can_scan: false,
                can_enrich: false,
                can_generate_outreach: true,
                can_manage_team: false,
                can_delete: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_scan: bool,
    pub can_enrich: bool,
    pub can_generate_outreach: bool,
    pub can_manage_team: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvitation {
    pub id: String,
    pub code: String,
    pub email: String,
    pub role: Role,
    pub invited_by: Option<String>,
    pub expires_at: String,
    pub accepted_at: Option<String>,
    pub created_at: String,
}

impl TeamInvitation {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        chrono::DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|t| t.with_timezone(&chrono::Utc) <= now)
            .unwrap_or(true)
    }
}
