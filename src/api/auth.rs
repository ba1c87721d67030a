use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use crate::auth::session::{constant_time_eq, token_from_cookie_header};
use crate::errors::BlackCardError;
use crate::models::{Permissions, Role, User};
use super::AppState;

/// Who is making the request. Inserted into request extensions by
/// [`api_auth_middleware`].
#[derive(Debug, Clone)]
pub enum Actor {
    User(User),
    /// Holder of the configured bearer token. Acts as an admin.
    ApiToken,
    /// No credentials while `server.require_auth` is off.
    Anonymous,
}

impl Actor {
    pub fn permissions(&self) -> Permissions {
        match self {
            Actor::User(user) => user.role.permissions(),
            Actor::ApiToken | Actor::Anonymous => Role::Admin.permissions(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Actor::User(user) => Some(user.id.as_str()),
            _ => None,
        }
    }

    /// Fail with a permission error unless `check` holds for this actor.
    pub fn require(&self, check: fn(&Permissions) -> bool, action: &str) -> Result<(), BlackCardError> {
        if check(&self.permissions()) {
            Ok(())
        } else {
            Err(BlackCardError::Permission(format!("Your role is not allowed to {}", action)))
        }
    }
}

pub fn session_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Resolve the caller from the session cookie or the bearer token. Without
/// either, the request is rejected when auth is required and passes as
/// anonymous otherwise.
pub async fn api_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BlackCardError> {
    let headers = request.headers();

    let mut actor = None;
    if let Some(user_id) = session_token(headers).and_then(|t| state.sessions.resolve(t)) {
        if let Some(user) = state.db.get_user(&user_id)? {
            actor = Some(Actor::User(user));
        }
    }
    if actor.is_none() {
        if let (Some(expected), Some(given)) = (state.api_token.as_deref(), bearer_token(headers)) {
            if !expected.is_empty() {
                if !constant_time_eq(given, expected) {
                    return Err(BlackCardError::Authentication("Invalid API token".into()));
                }
                actor = Some(Actor::ApiToken);
            }
        }
    }

    let actor = match actor {
        Some(a) => a,
        None if state.require_auth => {
            return Err(BlackCardError::Authentication("Login required".into()));
        }
        None => Actor::Anonymous,
    };

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_rep_cannot_delete() {
        let rep = Actor::User(User {
            id: "u1".into(),
            email: "rep@machinemind.co".into(),
            name: "Rep".into(),
            role: Role::Rep,
            password_hash: None,
            created_at: String::new(),
            last_login_at: None,
        });
        assert!(rep.require(|p| p.can_generate_outreach, "generate outreach").is_ok());
        assert!(matches!(
            rep.require(|p| p.can_delete, "delete businesses"),
            Err(BlackCardError::Permission(_))
        ));
        assert!(Actor::ApiToken.require(|p| p.can_manage_team, "manage the team").is_ok());
    }
}
