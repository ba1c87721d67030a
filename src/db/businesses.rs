use rusqlite::types::Value;
use serde::Serialize;
use crate::errors::BlackCardError;
use crate::models::{AiReadiness, Business, BusinessFilter, BusinessPatch, Category, Enrichment, NewBusiness, OutreachStatus};
use super::connection::{new_id, now};
use super::Database;

const BUSINESS_COLUMNS: &str = "id, name, category, city, address, phone, whatsapp, email, website, instagram, rating, review_count, response_time_hours, place_id, scan_id, ai_score, ai_readiness, ai_summary, outreach_status, notes, created_at, updated_at";

const MAX_PAGE: usize = 500;
const DEFAULT_PAGE: usize = 100;

fn row_to_business(row: &rusqlite::Row) -> rusqlite::Result<Business> {
    Ok(Business {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        city: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        whatsapp: row.get(6)?,
        email: row.get(7)?,
        website: row.get(8)?,
        instagram: row.get(9)?,
        rating: row.get(10)?,
        review_count: row.get(11)?,
        response_time_hours: row.get(12)?,
        place_id: row.get(13)?,
        scan_id: row.get(14)?,
        ai_score: row.get(15)?,
        ai_readiness: row.get::<_, Option<String>>(16)?.as_deref().and_then(AiReadiness::parse),
        ai_summary: row.get(17)?,
        outreach_status: OutreachStatus::parse(&row.get::<_, String>(18)?).unwrap_or_default(),
        notes: row.get(19)?,
        created_at: row.get(20)?,
        updated_at: row.get(21)?,
    })
}

/// Aggregate counts for the dashboard header.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStats {
    pub total: i64,
    pub enriched: i64,
    pub with_email: i64,
    pub with_website: i64,
    pub with_phone: i64,
    pub average_score: Option<f64>,
    pub by_status: serde_json::Map<String, serde_json::Value>,
    pub by_category: serde_json::Map<String, serde_json::Value>,
}

impl Database {
    pub fn create_business(&self, new: &NewBusiness, scan_id: Option<&str>) -> Result<Business, BlackCardError> {
        let id = new_id();
        let ts = now();
        let category = Category::normalize_label(&new.category);
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO businesses (id, name, category, city, address, phone, whatsapp, email, website, instagram, rating, review_count, response_time_hours, place_id, scan_id, outreach_status, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 'pending', ?16, ?17, ?17)",
                rusqlite::params![
                    id, new.name, category, new.city, new.address, new.phone, new.whatsapp,
                    new.email, new.website, new.instagram, new.rating, new.review_count,
                    new.response_time_hours, new.place_id, scan_id, new.notes, ts,
                ],
            ).map_err(|e| match e {
                rusqlite::Error::SqliteFailure(f, _) if f.code == rusqlite::ErrorCode::ConstraintViolation => {
                    BlackCardError::Conflict(format!(
                        "Business with place id '{}' already exists",
                        new.place_id.as_deref().unwrap_or_default()
                    ))
                }
                e => BlackCardError::Database(format!("Failed to create business: {}", e)),
            })?;
        }
        self.get_business(&id)?
            .ok_or_else(|| BlackCardError::Internal("Business vanished after insert".into()))
    }

    /// Insert or refresh a business found by a scan. Businesses are keyed by
    /// their places id; enrichment and outreach status survive a rescan.
    pub fn upsert_business_by_place(&self, new: &NewBusiness, scan_id: &str) -> Result<Business, BlackCardError> {
        let place_id = match new.place_id.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return self.create_business(new, Some(scan_id)),
        };

        let existing: Option<String> = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare("SELECT id FROM businesses WHERE place_id = ?1")?;
            match stmt.query_row(rusqlite::params![place_id], |row| row.get(0)) {
                Ok(id) => Some(id),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(BlackCardError::Database(format!("Query error: {}", e))),
            }
        };

        match existing {
            None => self.create_business(new, Some(scan_id)),
            Some(id) => {
                {
                    let conn = self.lock()?;
                    conn.execute(
                        "UPDATE businesses SET name = ?2, category = ?3, city = ?4, address = COALESCE(?5, address), phone = COALESCE(?6, phone), website = COALESCE(?7, website), instagram = COALESCE(?8, instagram), rating = COALESCE(?9, rating), review_count = COALESCE(?10, review_count), scan_id = ?11, updated_at = ?12 WHERE id = ?1",
                        rusqlite::params![
                            id, new.name, Category::normalize_label(&new.category), new.city, new.address, new.phone,
                            new.website, new.instagram, new.rating, new.review_count, scan_id, now(),
                        ],
                    ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
                }
                self.get_business(&id)?
                    .ok_or_else(|| BlackCardError::NotFound(format!("Business {}", id)))
            }
        }
    }

    pub fn get_business(&self, id: &str) -> Result<Option<Business>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM businesses WHERE id = ?1", BUSINESS_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![id], row_to_business) {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    /// Like `get_business`, but a missing row is an error.
    pub fn require_business(&self, id: &str) -> Result<Business, BlackCardError> {
        self.get_business(id)?
            .ok_or_else(|| BlackCardError::NotFound(format!("Business {}", id)))
    }

    pub fn list_businesses(&self, filter: &BusinessFilter) -> Result<Vec<Business>, BlackCardError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(city) = filter.city.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(city.to_string()));
            clauses.push(format!("city = ?{} COLLATE NOCASE", params.len()));
        }
        if let Some(category) = filter.category.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(Value::Text(Category::normalize_label(category)));
            clauses.push(format!("category = ?{} COLLATE NOCASE", params.len()));
        }
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(status.to_string()));
            clauses.push(format!("outreach_status = ?{}", params.len()));
        }
        if let Some(min) = filter.min_score {
            params.push(Value::Integer(min));
            clauses.push(format!("ai_score >= ?{}", params.len()));
        }
        for (flag, column) in [
            (filter.has_email, "email"),
            (filter.has_website, "website"),
            (filter.has_phone, "phone"),
        ] {
            match flag {
                Some(true) => clauses.push(format!("({0} IS NOT NULL AND {0} != '')", column)),
                Some(false) => clauses.push(format!("({0} IS NULL OR {0} = '')", column)),
                None => {}
            }
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(Value::Text(format!("%{}%", search)));
            let n = params.len();
            clauses.push(format!("(name LIKE ?{n} OR address LIKE ?{n} OR notes LIKE ?{n})"));
        }

        let mut sql = format!("SELECT {} FROM businesses", BUSINESS_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE).min(MAX_PAGE);
        let offset = filter.offset.unwrap_or(0);
        sql.push_str(&format!(
            " ORDER BY ai_score IS NULL, ai_score DESC, created_at DESC LIMIT {} OFFSET {}",
            limit, offset
        ));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), row_to_business)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }

    pub fn update_business(&self, id: &str, patch: &BusinessPatch) -> Result<Business, BlackCardError> {
        let existing = self.require_business(id)?;
        let category = patch.category.as_deref()
            .map(Category::normalize_label)
            .unwrap_or_else(|| existing.category.clone());
        {
            let conn = self.lock()?;
            conn.execute(
                "UPDATE businesses SET name = ?2, category = ?3, city = ?4, address = ?5, phone = ?6, whatsapp = ?7, email = ?8, website = ?9, instagram = ?10, rating = ?11, review_count = ?12, response_time_hours = ?13, notes = ?14, updated_at = ?15 WHERE id = ?1",
                rusqlite::params![
                    id,
                    patch.name.as_ref().unwrap_or(&existing.name),
                    category,
                    patch.city.as_ref().unwrap_or(&existing.city),
                    patch.address.as_ref().or(existing.address.as_ref()),
                    patch.phone.as_ref().or(existing.phone.as_ref()),
                    patch.whatsapp.as_ref().or(existing.whatsapp.as_ref()),
                    patch.email.as_ref().or(existing.email.as_ref()),
                    patch.website.as_ref().or(existing.website.as_ref()),
                    patch.instagram.as_ref().or(existing.instagram.as_ref()),
                    patch.rating.or(existing.rating),
                    patch.review_count.or(existing.review_count),
                    patch.response_time_hours.or(existing.response_time_hours),
                    patch.notes.as_ref().or(existing.notes.as_ref()),
                    now(),
                ],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        }
        self.require_business(id)
    }

    pub fn update_business_status(&self, id: &str, status: OutreachStatus) -> Result<Business, BlackCardError> {
        let changed = {
            let conn = self.lock()?;
            conn.execute(
                "UPDATE businesses SET outreach_status = ?2, updated_at = ?3 WHERE id = ?1",
                rusqlite::params![id, status.as_str(), now()],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?
        };
        if changed == 0 {
            return Err(BlackCardError::NotFound(format!("Business {}", id)));
        }
        self.require_business(id)
    }

    pub fn set_enrichment(&self, id: &str, enrichment: &Enrichment) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE businesses SET ai_score = ?2, ai_readiness = ?3, ai_summary = ?4, updated_at = ?5 WHERE id = ?1",
            rusqlite::params![
                id,
                enrichment.ai_score,
                enrichment.ai_readiness.as_str(),
                enrichment.ai_summary,
                now(),
            ],
        ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        if changed == 0 {
            return Err(BlackCardError::NotFound(format!("Business {}", id)));
        }
        Ok(())
    }

    pub fn delete_business(&self, id: &str) -> Result<bool, BlackCardError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM businesses WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| BlackCardError::Database(format!("Delete failed: {}", e)))?;
        Ok(changed > 0)
    }

    pub fn business_stats(&self) -> Result<BusinessStats, BlackCardError> {
        let conn = self.lock()?;
        let mut stats = conn.query_row(
            "SELECT COUNT(*), \
                    COUNT(ai_score), \
                    SUM(CASE WHEN email IS NOT NULL AND email != '' THEN 1 ELSE 0 END), \
                    SUM(CASE WHEN website IS NOT NULL AND website != '' THEN 1 ELSE 0 END), \
                    SUM(CASE WHEN phone IS NOT NULL AND phone != '' THEN 1 ELSE 0 END), \
                    AVG(ai_score) \
             FROM businesses",
            [],
            |row| {
                Ok(BusinessStats {
                    total: row.get(0)?,
                    enriched: row.get(1)?,
                    with_email: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    with_website: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    with_phone: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                    average_score: row.get(5)?,
                    ..Default::default()
                })
            },
        ).map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        for (column, target) in [
            ("outreach_status", &mut stats.by_status),
            ("category", &mut stats.by_category),
        ] {
            let sql = format!("SELECT {0}, COUNT(*) FROM businesses GROUP BY {0}", column);
            let mut stmt = conn.prepare(&sql)
                .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
                .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;
            for row in rows {
                let (key, count) = row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?;
                target.insert(key, serde_json::json!(count));
            }
        }

        Ok(stats)
    }
}
