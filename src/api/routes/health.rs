use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.db.count_users() {
        Ok(_) => "ok",
        Err(_) => "error",
    };
    Json(json!({
        "status": "healthy",
        "service": "blackcard",
        "version": env!("CARGO_PKG_VERSION"),
        "gitHash": option_env!("GIT_HASH").unwrap_or("dev"),
        "builtAt": option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        "database": database,
        "llm": state.llm.as_ref().map(|l| l.label()),
        "places": state.places.as_ref().map(|p| p.provider_name().to_string()),
    }))
}
