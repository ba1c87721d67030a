use axum::{
    extract::State,
    Extension, Json,
};
use serde_json::{json, Value};
use crate::api::auth::Actor;
use crate::api::AppState;
use crate::db::settings::{DEFAULT_LANGUAGE, SENDER_COMPANY, SENDER_NAME};
use crate::errors::BlackCardError;
use crate::outreach::Language;
use super::ApiResult;

/// Accept the stored key or its camelCase spelling.
fn setting_key(key: &str) -> Option<&'static str> {
    match key {
        "sender_name" | "senderName" => Some(SENDER_NAME),
        "sender_company" | "senderCompany" => Some(SENDER_COMPANY),
        "default_language" | "defaultLanguage" => Some(DEFAULT_LANGUAGE),
        _ => None,
    }
}

/// Stored settings merged over the configured defaults.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let sender = state.sender()?;
    let language = state.language()?;
    Ok(Json(json!({
        "senderName": sender.name,
        "senderCompany": sender.company,
        "defaultLanguage": language,
        "stored": state.db.get_all_settings()?,
    })))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    actor.require(|p| p.can_manage_team, "change settings")?;
    let obj = body.as_object()
        .ok_or_else(|| BlackCardError::Validation("Settings body must be a JSON object".into()))?;

    // Validate everything before writing anything.
    let mut updates = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let key = setting_key(key)
            .ok_or_else(|| BlackCardError::Validation(format!("Unknown setting '{}'", key)))?;
        let value = match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if key == DEFAULT_LANGUAGE && Language::parse(&value).is_none() {
            return Err(BlackCardError::Validation(format!("Unsupported language '{}'", value)));
        }
        updates.push((key, value));
    }

    for (key, value) in &updates {
        state.db.set_setting(key, value)?;
    }

    Ok(Json(json!({"updated": updates.len()})))
}
