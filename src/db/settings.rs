use crate::errors::BlackCardError;
use crate::outreach::{Language, Sender};
use super::Database;

pub const SENDER_NAME: &str = "sender_name";
pub const SENDER_COMPANY: &str = "sender_company";
pub const DEFAULT_LANGUAGE: &str = "default_language";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        ).map_err(|e| BlackCardError::Database(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    pub fn get_all_settings(&self) -> Result<serde_json::Value, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        let mut settings = serde_json::Map::new();
        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        }).map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        for row in rows {
            let (key, value): (String, String) = row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?;
            settings.insert(key, serde_json::Value::String(value));
        }

        Ok(serde_json::Value::Object(settings))
    }

    /// Message signature: stored settings win over the configured defaults.
    pub fn sender(&self, fallback: &Sender) -> Result<Sender, BlackCardError> {
        Ok(Sender {
            name: self.get_setting(SENDER_NAME)?
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| fallback.name.clone()),
            company: self.get_setting(SENDER_COMPANY)?
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| fallback.company.clone()),
        })
    }

    pub fn default_language(&self, fallback: Language) -> Result<Language, BlackCardError> {
        Ok(self.get_setting(DEFAULT_LANGUAGE)?
            .and_then(|l| Language::parse(&l))
            .unwrap_or(fallback))
    }
}
