use crate::errors::BlackCardError;
use crate::models::UltimateOutreach;
use crate::outreach::BlackCardPackage;
use super::connection::{new_id, now};
use super::Database;

fn row_to_ultimate(row: &rusqlite::Row) -> rusqlite::Result<UltimateOutreach> {
    let json: String = row.get(4)?;
    let package: BlackCardPackage = serde_json::from_str(&json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(UltimateOutreach {
        id: row.get(0)?,
        business_id: row.get(1)?,
        user_id: row.get(2)?,
        language: row.get(3)?,
        package,
        created_at: row.get(5)?,
    })
}

impl Database {
    pub fn save_black_card(&self, package: &BlackCardPackage, user_id: Option<&str>) -> Result<UltimateOutreach, BlackCardError> {
        let id = new_id();
        let json = serde_json::to_string(package)?;
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO ultimate_outreach (id, business_id, user_id, language, package_json, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, package.business_id, user_id, package.language.as_str(), json, now()],
            ).map_err(|e| BlackCardError::Database(format!("Failed to save package: {}", e)))?;
        }
        self.latest_black_card(&package.business_id)?
            .ok_or_else(|| BlackCardError::Internal("Package vanished after insert".into()))
    }

    /// Most recently generated package for a business.
    pub fn latest_black_card(&self, business_id: &str) -> Result<Option<UltimateOutreach>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, business_id, user_id, language, package_json, created_at FROM ultimate_outreach WHERE business_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1"
        ).map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![business_id], row_to_ultimate) {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }
}
