use crate::errors::BlackCardError;
use crate::models::{Scan, ScanStatus};
use crate::utils::truncation::truncate_error;
use super::connection::now;
use super::Database;

const SCAN_COLUMNS: &str = "id, city, category, status, total_found, total_enriched, error_message, created_at, completed_at";

fn row_to_scan(row: &rusqlite::Row) -> rusqlite::Result<Scan> {
    Ok(Scan {
        id: row.get(0)?,
        city: row.get(1)?,
        category: row.get(2)?,
        status: ScanStatus::parse(&row.get::<_, String>(3)?).unwrap_or(ScanStatus::Error),
        total_found: row.get(4)?,
        total_enriched: row.get(5)?,
        error_message: row.get(6)?,
        created_at: row.get(7)?,
        completed_at: row.get(8)?,
    })
}

impl Database {
    pub fn create_scan(&self, id: &str, city: &str, category: &str) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scans (id, city, category, status, created_at) VALUES (?1, ?2, ?3, 'pending', ?4)",
            rusqlite::params![id, city, category, now()],
        ).map_err(|e| BlackCardError::Database(format!("Failed to create scan: {}", e)))?;
        Ok(())
    }

    pub fn update_scan_status(&self, id: &str, status: ScanStatus) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        if status.is_terminal() {
            conn.execute(
                "UPDATE scans SET status = ?2, completed_at = ?3 WHERE id = ?1",
                rusqlite::params![id, status.as_str(), now()],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        } else {
            conn.execute(
                "UPDATE scans SET status = ?2 WHERE id = ?1",
                rusqlite::params![id, status.as_str()],
            ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        }
        Ok(())
    }

    pub fn complete_scan(&self, id: &str, total_found: i64, total_enriched: i64) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE scans SET status = 'completed', total_found = ?2, total_enriched = ?3, completed_at = ?4 WHERE id = ?1",
            rusqlite::params![id, total_found, total_enriched, now()],
        ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        Ok(())
    }

    pub fn fail_scan(&self, id: &str, error: &str) -> Result<(), BlackCardError> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE scans SET status = 'error', error_message = ?2, completed_at = ?3 WHERE id = ?1",
            rusqlite::params![id, truncate_error(error), now()],
        ).map_err(|e| BlackCardError::Database(format!("Update failed: {}", e)))?;
        Ok(())
    }

    pub fn get_scan(&self, id: &str) -> Result<Option<Scan>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM scans WHERE id = ?1", SCAN_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![id], row_to_scan) {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BlackCardError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_scans(&self, limit: usize) -> Result<Vec<Scan>, BlackCardError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM scans ORDER BY created_at DESC LIMIT ?1", SCAN_COLUMNS);
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map(rusqlite::params![limit as i64], row_to_scan)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut scans = Vec::new();
        for row in rows {
            scans.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(scans)
    }
}
