use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::api::auth::{session_token, Actor};
use crate::api::models::{
    AcceptInvitationRequest, InviteRequest, LimitQuery, LoginRequest, MagicLinkRequest,
    MagicLinkVerifyRequest, RoleUpdateRequest,
};
use crate::api::AppState;
use crate::auth::session::{
    clear_session_cookie, random_token, session_cookie, INVITATION_DAYS, MAGIC_LINK_MINUTES,
};
use crate::auth::{hash_password, verify_password};
use crate::errors::BlackCardError;
use crate::models::{ActivityDetails, Role, TeamInvitation, User};
use super::businesses::record;
use super::ApiResult;

type WithCookie = ([(HeaderName, String); 1], Json<Value>);

fn parse_role(role: &str) -> ApiResult<Role> {
    Role::parse(role.trim())
        .ok_or_else(|| BlackCardError::Validation(format!("Unknown role '{}'", role)))
}

/// Open a session for `user` and answer with its cookie.
fn start_session(state: &AppState, user: &User) -> ApiResult<WithCookie> {
    state.db.record_login(&user.id)?;
    let token = state.sessions.create(&user.id);
    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "user": user, "permissions": user.role.permissions() })),
    ))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Value>> {
    actor.require(|p| p.can_manage_team, "manage the team")?;
    let invitations = state.db.list_invitations()?;
    Ok(Json(json!({ "invitations": invitations })))
}

pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<InviteRequest>,
) -> ApiResult<(StatusCode, Json<TeamInvitation>)> {
    actor.require(|p| p.can_manage_team, "manage the team")?;
    let email = req.email.trim();
    if !email.contains('@') {
        return Err(BlackCardError::Validation(format!("Invalid email '{}'", email)));
    }
    let role = parse_role(&req.role)?;
    if state.db.get_user_by_email(email)?.is_some() {
        return Err(BlackCardError::Conflict(format!("{} is already a member", email)));
    }

    let expires_at = Utc::now() + Duration::days(INVITATION_DAYS);
    let invitation = state.db.create_invitation(&random_token(24), email, role, actor.user_id(), expires_at)?;
    info!(email = %invitation.email, role = role.as_str(), expires_at = %invitation.expires_at, "Invitation created");
    record(&state, &actor, ActivityDetails::InvitationCreated {
        email: invitation.email.clone(),
        role: role.as_str().to_string(),
    });
    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Redeem an invitation code: create the account and log it in.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(req): Json<AcceptInvitationRequest>,
) -> ApiResult<WithCookie> {
    let invitation = state.db.get_invitation_by_code(req.code.trim())?
        .ok_or_else(|| BlackCardError::NotFound("Invitation".into()))?;
    if invitation.accepted_at.is_some() {
        return Err(BlackCardError::Conflict("Invitation already used".into()));
    }
    if invitation.is_expired(Utc::now()) {
        return Err(BlackCardError::Validation("Invitation has expired".into()));
    }
    if req.name.trim().is_empty() {
        return Err(BlackCardError::Validation("name is required".into()));
    }
    if state.db.get_user_by_email(&invitation.email)?.is_some() {
        return Err(BlackCardError::Conflict(format!("{} is already a member", invitation.email)));
    }
    let hash = hash_password(&req.password)?;
    let user = state.db.accept_invitation(&invitation, req.name.trim(), &hash)?;
    info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "User joined");
    record(&state, &Actor::User(user.clone()), ActivityDetails::UserJoined {
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
    });
    start_session(&state, &user)
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<WithCookie> {
    let invalid = || BlackCardError::Authentication("Invalid email or password".into());
    let user = state.db.get_user_by_email(&req.email)?.ok_or_else(invalid)?;
    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
    if !verify_password(&req.password, hash)? {
        warn!(email = %user.email, "Failed login");
        return Err(invalid());
    }

    record(&state, &Actor::User(user.clone()), ActivityDetails::Login { method: "password".into() });
    start_session(&state, &user)
}

/// Always answers `sent`, whether or not the address belongs to a member.
/// Delivery is the server log; there is no mail transport.
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> ApiResult<Json<Value>> {
    match state.db.get_user_by_email(&req.email)? {
        Some(user) => {
            let token = random_token(32);
            state.db.create_magic_link(&token, &user.email, Utc::now() + Duration::minutes(MAGIC_LINK_MINUTES))?;
            info!(
                email = %user.email,
                verify = "POST /api/team/magic-link/verify",
                token = %token,
                expires_in_minutes = MAGIC_LINK_MINUTES,
                "Magic link issued"
            );
        }
        None => info!(email = %req.email.trim(), "Magic link requested for unknown email"),
    }
    Ok(Json(json!({ "sent": true })))
}

pub async fn verify_magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkVerifyRequest>,
) -> ApiResult<WithCookie> {
    let invalid = || BlackCardError::Authentication("Magic link is invalid or expired".into());
    let email = state.db.consume_magic_link(req.token.trim(), Utc::now())?.ok_or_else(invalid)?;
    let user = state.db.get_user_by_email(&email)?.ok_or_else(invalid)?;

    record(&state, &Actor::User(user.clone()), ActivityDetails::Login { method: "magic_link".into() });
    start_session(&state, &user)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> WithCookie {
    let revoked = session_token(&headers).is_some_and(|t| state.sessions.revoke(t));
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "loggedOut": revoked })),
    )
}

pub async fn me(Extension(actor): Extension<Actor>) -> Json<Value> {
    let user = match &actor {
        Actor::User(user) => Some(user),
        _ => None,
    };
    Json(json!({ "user": user, "permissions": actor.permissions() }))
}

pub async fn list_members(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let members = state.db.list_users()?;
    Ok(Json(json!({ "members": members, "total": members.len() })))
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<RoleUpdateRequest>,
) -> ApiResult<Json<User>> {
    actor.require(|p| p.can_manage_team, "manage the team")?;
    let role = parse_role(&req.role)?;
    if actor.user_id() == Some(id.as_str()) {
        return Err(BlackCardError::Validation("You cannot change your own role".into()));
    }
    let user = state.db.update_user_role(&id, role)?;
    info!(user_id = %id, role = role.as_str(), "Role changed");
    record(&state, &actor, ActivityDetails::RoleChanged { user_id: id, role: role.as_str().to_string() });
    Ok(Json(user))
}

pub async fn activity(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Value>> {
    let entries = state.db.list_activity(query.limit.unwrap_or(50).min(500))?;
    Ok(Json(json!({ "activity": entries })))
}
