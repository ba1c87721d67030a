use tracing::{debug, warn};

/// Name of the environment variable a config value points at, for `$VAR`
/// and `${VAR}` forms.
fn env_reference(value: &str) -> Option<&str> {
    let name = value.strip_prefix('$')?;
    let name = name
        .strip_prefix('{')
        .and_then(|n| n.strip_suffix('}'))
        .unwrap_or(name);
    (!name.is_empty()).then_some(name)
}

/// Resolve `$VAR` / `${VAR}` from the environment. A reference to an unset
/// variable is kept as written so the failure shows up at the provider
/// rather than as an empty key.
pub fn resolve_credential(value: &str) -> String {
    let Some(var_name) = env_reference(value.trim()) else {
        return value.to_string();
    };
    match std::env::var(var_name) {
        Ok(resolved) => {
            debug!(var = %var_name, "Resolved credential from environment");
            resolved
        }
        Err(_) => {
            warn!(var = %var_name, "Environment variable not set, using literal");
            value.to_string()
        }
    }
}

/// Mask a secret for display, keeping the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
