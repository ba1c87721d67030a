use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                    "require_auth": { "type": "boolean" },
                    "api_token": { "type": "string" },
                    "cors_origins": { "type": "array", "items": { "type": "string" } }
                }
            },
            "database": {
                "type": "object",
                "required": ["path"],
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["anthropic", "openai", "openai_compatible"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" }
                }
            },
            "places": {
                "type": "object",
                "properties": {
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "default_limit": { "type": "integer", "minimum": 1, "maximum": 60 }
                }
            },
            "outreach": {
                "type": "object",
                "properties": {
                    "default_language": { "type": "string", "enum": ["es", "en"] },
                    "sender_name": { "type": "string" },
                    "sender_company": { "type": "string" },
                    "loss_overrides": { "type": "array", "items": { "$ref": "#/$defs/loss_override" } }
                }
            }
        },
        "$defs": {
            "loss_override": {
                "type": "object",
                "required": ["category", "offer", "min", "max"],
                "properties": {
                    "category": { "type": "string" },
                    "offer": { "type": "string" },
                    "min": { "type": "integer", "minimum": 0 },
                    "max": { "type": "integer", "minimum": 0 }
                }
            }
        }
    })
});
