use chrono::{DateTime, Utc};
use crate::errors::BlackCardError;
use crate::models::{ActivityDetails, ActivityLog, Role, TeamInvitation, User};
use super::connection::{new_id, now};
use super::Database;

const USER_COLUMNS: &str = "id, email, name, role, password_hash, created_at, last_login_at";
const INVITATION_COLUMNS: &str = "id, code, email, role, invited_by, expires_at, accepted_at, created_at";

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role: Role::parse(&row.get::<_, String>(3)?).unwrap_or(Role::Rep),
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
        last_login_at: row.get(6)?,
    })
}

fn row_to_invitation(row: &rusqlite::Row) -> rusqlite::Result<TeamInvitation> {
    Ok(TeamInvitation {
        id: row.get(0)?,
        code: row.get(1)?,
        email: row.get(2)?,
        role: Role::parse(&row.get::<_, String>(3)?).unwrap_or(Role::Rep),
        invited_by: row.get(4)?,
        expires_at: row.get(5)?,
        accepted_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(f, _) if f.code == rusqlite::ErrorCode::ConstraintViolation)
}

impl Database {
    // ---- users ----

    pub fn create_user(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password_hash: Option<&str>,
    ) -> Result<User, BlackCardError> {
        let id = new_id();
        let email = email.trim().to_lowercase();
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO users (id, email, name, role, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, email, name, role.as_str(), password_hash, now()],
            ).map_err(|e| {
                if is_unique_violation(&e) {
                    BlackCardError::Conflict(format!("A user with email '{}' already exists", email))
                } else {
                    BlackCardError::Database(format!("Failed to create user: {}", e))
                }
            })?;
        }
        self.get_user(&id)?
            .ok_or_else(|| BlackCardError::Internal("User vanished after insert".into()))
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>, BlackCardError> {
        self.query_user(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS), id)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, BlackCardError> {
        let email = email.trim().to_lowercase();
        self.query_user(&format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS), &email)
    }

    fn query_user(&self, sql: &str, key: &str) -> Result<Option<User>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![key], row_to_user) {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_users(&self) -> Result<Vec<User>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt.query_map([], row_to_user)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(users)
    }

    pub fn count_users(&self) -> Result<i64, BlackCardError> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))
    }

    pub fn update_user_role(&self, id: &str, role: Role) -> Result<User, BlackCardError> {
        let changed = {
            let conn = self.lock()?;
            conn.execute(
                "UPDATE users SET role = ?2 WHERE id = ?1",
                rusqlite::params![id, role.as_str()],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?
        };
        if changed == 0 {
            return Err(BlackCardError::NotFound(format!("User {}", id)));
        }
        self.get_user(id)?
            .ok_or_else(|| BlackCardError::NotFound(format!("User {}", id)))
    }

    pub fn record_login(&self, id: &str) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE users SET last_login_at = ?2 WHERE id = ?1",
            rusqlite::params![id, now()],
        ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        Ok(())
    }

    // ---- invitations ----

    pub fn create_invitation(
        &self,
        code: &str,
        email: &str,
        role: Role,
        invited_by: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<TeamInvitation, BlackCardError> {
        let id = new_id();
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO team_invitations (id, code, email, role, invited_by, expires_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id, code, email.trim().to_lowercase(), role.as_str(), invited_by,
                    expires_at.to_rfc3339(), now(),
                ],
            ).map_err(|e| {
                if is_unique_violation(&e) {
                    BlackCardError::Conflict("Invitation code already in use".into())
                } else {
                    BlackCardError::Database(format!("Failed to create invitation: {}", e))
                }
            })?;
        }
        self.get_invitation_by_code(code)?
            .ok_or_else(|| BlackCardError::Internal("Invitation vanished after insert".into()))
    }

    pub fn get_invitation_by_code(&self, code: &str) -> Result<Option<TeamInvitation>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM team_invitations WHERE code = ?1", INVITATION_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![code], row_to_invitation) {
            Ok(i) => Ok(Some(i)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_invitations(&self) -> Result<Vec<TeamInvitation>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM team_invitations ORDER BY created_at DESC", INVITATION_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt.query_map([], row_to_invitation)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }

    /// Claim an invitation. Returns false when it was already accepted, so
    /// two concurrent accepts cannot both succeed.
    /// Claim an invitation and create its account in one transaction. A
    /// failed insert leaves the invitation unclaimed.
    pub fn accept_invitation(
        &self,
        invitation: &TeamInvitation,
        name: &str,
        password_hash: &str,
    ) -> Result<User, BlackCardError> {
        let id = new_id();
        let email = invitation.email.trim().to_lowercase();
        {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let ts = now();
            let claimed = tx.execute(
                "UPDATE team_invitations SET accepted_at = ?2 WHERE id = ?1 AND accepted_at IS NULL",
                rusqlite::params![invitation.id, ts],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
            if claimed != 1 {
                return Err(BlackCardError::Conflict("Invitation already used".into()));
            }
            tx.execute(
                "INSERT INTO users (id, email, name, role, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, email, name, invitation.role.as_str(), password_hash, ts],
            ).map_err(|e| {
                if is_unique_violation(&e) {
                    BlackCardError::Conflict(format!("A user with email '{}' already exists", email))
                } else {
                    BlackCardError::Database(format!("Failed to create user: {}", e))
                }
            })?;
            tx.commit()?;
        }
        self.get_user(&id)?
            .ok_or_else(|| BlackCardError::Internal("User vanished after insert".into()))
    }

    // ---- magic links ----

    pub fn create_magic_link(&self, token: &str, email: &str, expires_at: DateTime<Utc>) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO magic_links (token, email, expires_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![token, email.trim().to_lowercase(), expires_at.to_rfc3339()],
        ).map_err(|e| BlackCardError::Database(format!("Failed to create magic link: {}", e)))?;
        Ok(())
    }

    /// Use up a magic-link token and return the email it was issued for.
    /// Unknown, expired and already-used tokens all yield `None`.
    pub fn consume_magic_link(&self, token: &str, at: DateTime<Utc>) -> Result<Option<String>, BlackCardError> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT email, expires_at, used_at FROM magic_links WHERE token = ?1",
            rusqlite::params![token],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, Option<String>>(2)?)),
        );
        let (email, expires_at, used_at) = match row {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(BlackCardError::Database(format!("Query error: {}", e))),
        };
        if used_at.is_some() {
            return Ok(None);
        }
        let expired = DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t.with_timezone(&Utc) <= at)
            .unwrap_or(true);
        if expired {
            return Ok(None);
        }

        let changed = conn.execute(
            "UPDATE magic_links SET used_at = ?2 WHERE token = ?1 AND used_at IS NULL",
            rusqlite::params![token, at.to_rfc3339()],
        ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        Ok((changed == 1).then_some(email))
    }

    // ---- activity ----

    pub fn log_activity(&self, user_id: Option<&str>, details: &ActivityDetails) -> Result<(), BlackCardError> {
        let json = serde_json::to_string(details)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO activity_log (id, user_id, action, details_json, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![new_id(), user_id, details.action(), json, now()],
        ).map_err(|e| BlackCardError::Database(format!("Failed to log activity: {}", e)))?;
        Ok(())
    }

    pub fn list_activity(&self, limit: usize) -> Result<Vec<ActivityLog>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, action, details_json, created_at FROM activity_log ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ).map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map(rusqlite::params![limit as i64], |row: &rusqlite::Row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        }).map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            let (id, user_id, action, details, created_at) =
                row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?;
            // Rows written by an older build with an unknown shape are skipped.
            let Ok(details) = serde_json::from_str::<ActivityDetails>(&details) else {
                continue;
            };
            out.push(ActivityLog { id, user_id, action, details, created_at });
        }
        Ok(out)
    }
}
