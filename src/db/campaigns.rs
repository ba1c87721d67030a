use rusqlite::types::Value;
use crate::errors::BlackCardError;
use crate::models::{CampaignFilter, CampaignStatus, FollowUps, OutreachCampaign};
use crate::outreach::OutreachPackage;
use super::connection::{new_id, now};
use super::Database;

const CAMPAIGN_COLUMNS: &str = "id, business_id, user_id, status, framework, language, offer, loss_min, loss_max, signals, whatsapp_script, whatsapp_link, instagram_dm, email_subject, email_body, follow_up_day3, follow_up_day7, follow_up_day14, created_at, updated_at, sent_at, responded_at, converted_at";

fn row_to_campaign(row: &rusqlite::Row) -> rusqlite::Result<OutreachCampaign> {
    let signals: String = row.get(9)?;
    Ok(OutreachCampaign {
        id: row.get(0)?,
        business_id: row.get(1)?,
        user_id: row.get(2)?,
        status: CampaignStatus::parse(&row.get::<_, String>(3)?).unwrap_or(CampaignStatus::Draft),
        framework: row.get(4)?,
        language: row.get(5)?,
        offer: row.get(6)?,
        loss_min: row.get(7)?,
        loss_max: row.get(8)?,
        signals: serde_json::from_str(&signals).unwrap_or_default(),
        whatsapp_script: row.get(10)?,
        whatsapp_link: row.get(11)?,
        instagram_dm: row.get(12)?,
        email_subject: row.get(13)?,
        email_body: row.get(14)?,
        follow_ups: FollowUps {
            day3: row.get(15)?,
            day7: row.get(16)?,
            day14: row.get(17)?,
        },
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
        sent_at: row.get(20)?,
        responded_at: row.get(21)?,
        converted_at: row.get(22)?,
    })
}

impl Database {
    /// Persist a generated package as a `draft` campaign. Message text is
    /// stored exactly as rendered.
    pub fn create_campaign(&self, package: &OutreachPackage, user_id: Option<&str>) -> Result<OutreachCampaign, BlackCardError> {
        let id = new_id();
        let ts = now();
        let signals: Vec<&str> = package.signals.iter().map(|s| s.as_str()).collect();
        let signals_json = serde_json::to_string(&signals)?;
        let m = &package.messages;
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO outreach_campaigns (id, business_id, user_id, status, framework, language, offer, loss_min, loss_max, signals, whatsapp_script, whatsapp_link, instagram_dm, email_subject, email_body, follow_up_day3, follow_up_day7, follow_up_day14, created_at, updated_at) VALUES (?1, ?2, ?3, 'draft', ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?18)",
                rusqlite::params![
                    id,
                    package.business_id,
                    user_id,
                    m.framework.as_str(),
                    m.language.as_str(),
                    package.offer.offer,
                    package.offer.loss.min,
                    package.offer.loss.max,
                    signals_json,
                    m.whatsapp_script,
                    m.whatsapp_link,
                    m.instagram_dm,
                    m.email_subject,
                    m.email_body,
                    m.follow_ups.day3,
                    m.follow_ups.day7,
                    m.follow_ups.day14,
                    ts,
                ],
            ).map_err(|e| BlackCardError::Database(format!("Failed to create campaign: {}", e)))?;
        }
        self.get_campaign(&id)?
            .ok_or_else(|| BlackCardError::Internal("Campaign vanished after insert".into()))
    }

    pub fn get_campaign(&self, id: &str) -> Result<Option<OutreachCampaign>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM outreach_campaigns WHERE id = ?1", CAMPAIGN_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![id], row_to_campaign) {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<OutreachCampaign>, BlackCardError> {
        let mut clauses = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(status.to_string()));
            clauses.push(format!("status = ?{}", params.len()));
        }
        if let Some(business_id) = filter.business_id.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(business_id.to_string()));
            clauses.push(format!("business_id = ?{}", params.len()));
        }

        let mut sql = format!("SELECT {} FROM outreach_campaigns", CAMPAIGN_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC LIMIT {} OFFSET {}",
            filter.limit.unwrap_or(100).min(500),
            filter.offset.unwrap_or(0)
        ));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), row_to_campaign)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }

    /// Set a campaign's status and stamp the matching timestamp the first time
    /// the campaign reaches sent/responded/converted. Transitions are not
    /// validated. Returns the previous status and the updated row.
    pub fn update_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<(CampaignStatus, OutreachCampaign), BlackCardError> {
        let previous = self.get_campaign(id)?
            .ok_or_else(|| BlackCardError::NotFound(format!("Campaign {}", id)))?
            .status;

        let stamp = match status {
            CampaignStatus::Sent => Some("sent_at"),
            CampaignStatus::Responded => Some("responded_at"),
            CampaignStatus::Converted => Some("converted_at"),
            _ => None,
        };
        let ts = now();
        {
            let conn = self.lock()?;
            let result = match stamp {
                Some(column) => {
                    let sql = format!(
                        "UPDATE outreach_campaigns SET status = ?2, updated_at = ?3, {0} = COALESCE({0}, ?3) WHERE id = ?1",
                        column
                    );
                    conn.execute(&sql, rusqlite::params![id, status.as_str(), ts])
                }
                None => conn.execute(
                    "UPDATE outreach_campaigns SET status = ?2, updated_at = ?3 WHERE id = ?1",
                    rusqlite::params![id, status.as_str(), ts],
                ),
            };
            result.map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        }

        let updated = self.get_campaign(id)?
            .ok_or_else(|| BlackCardError::NotFound(format!("Campaign {}", id)))?;
        Ok((previous, updated))
    }

    pub fn delete_campaign(&self, id: &str) -> Result<bool, BlackCardError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM outreach_campaigns WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| BlackCardError::Database(format!("Delete failed: {}", e)))?;
        Ok(changed > 0)
    }
}
