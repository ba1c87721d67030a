use rusqlite::types::Value;
use crate::errors::BlackCardError;
use crate::models::{Event, IntentDetails, IntentFilter, IntentSignal, NewEvent, NewIntentSignal, NewVenueMonitor, VenueMonitor};
use super::connection::{new_id, now};
use super::Database;

const DEFAULT_STRENGTH: i64 = 50;

fn row_to_signal(row: &rusqlite::Row) -> rusqlite::Result<IntentSignal> {
    let details: String = row.get(9)?;
    let details = serde_json::from_str(&details)
        .unwrap_or(IntentDetails::Other { note: Some(details) });
    Ok(IntentSignal {
        id: row.get(0)?,
        city: row.get(1)?,
        category: row.get(2)?,
        kind: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        source: row.get(6)?,
        url: row.get(7)?,
        strength: row.get(8)?,
        details,
        detected_at: row.get(10)?,
    })
}

impl Database {
    pub fn create_intent_signal(&self, new: &NewIntentSignal) -> Result<IntentSignal, BlackCardError> {
        let strength = new.strength.unwrap_or(DEFAULT_STRENGTH);
        if !(0..=100).contains(&strength) {
            return Err(BlackCardError::Validation(format!("Strength must be 0-100, got {}", strength)));
        }
        let signal = IntentSignal {
            id: new_id(),
            city: new.city.clone(),
            category: new.category.clone(),
            kind: new.details.kind().to_string(),
            title: new.title.clone(),
            description: new.description.clone(),
            source: new.source.clone(),
            url: new.url.clone(),
            strength,
            details: new.details.clone(),
            detected_at: now(),
        };
        let details_json = serde_json::to_string(&signal.details)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO intent_signals (id, city, category, kind, title, description, source, url, strength, details_json, detected_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                signal.id, signal.city, signal.category, signal.kind, signal.title,
                signal.description, signal.source, signal.url, signal.strength,
                details_json, signal.detected_at,
            ],
        ).map_err(|e| BlackCardError::Database(format!("Failed to create intent signal: {}", e)))?;
        Ok(signal)
    }

    /// Signals are matched to businesses by city and category at query time.
    pub fn list_intent_signals(&self, filter: &IntentFilter) -> Result<Vec<IntentSignal>, BlackCardError> {
        let mut clauses = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(city) = filter.city.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(city.to_string()));
            clauses.push(format!("city = ?{} COLLATE NOCASE", params.len()));
        }
        if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(category.to_string()));
            clauses.push(format!("(category IS NULL OR category = ?{} COLLATE NOCASE)", params.len()));
        }
        if let Some(kind) = filter.kind.as_deref().filter(|s| !s.is_empty()) {
            params.push(Value::Text(kind.to_string()));
            clauses.push(format!("kind = ?{}", params.len()));
        }

        let mut sql = String::from(
            "SELECT id, city, category, kind, title, description, source, url, strength, details_json, detected_at FROM intent_signals",
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY strength DESC, detected_at DESC LIMIT {}",
            filter.limit.unwrap_or(100).min(500)
        ));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)
            .map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), row_to_signal)
            .map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }

    pub fn delete_intent_signal(&self, id: &str) -> Result<bool, BlackCardError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM intent_signals WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| BlackCardError::Database(format!("Delete failed: {}", e)))?;
        Ok(changed > 0)
    }

    pub fn create_event(&self, new: &NewEvent) -> Result<Event, BlackCardError> {
        chrono::DateTime::parse_from_rfc3339(&new.starts_at)
            .map_err(|_| BlackCardError::Validation(format!("startsAt '{}' is not an RFC 3339 timestamp", new.starts_at)))?;
        let event = Event {
            id: new_id(),
            name: new.name.clone(),
            city: new.city.clone(),
            venue: new.venue.clone(),
            starts_at: new.starts_at.clone(),
            expected_attendance: new.expected_attendance,
            category: new.category.clone(),
        };
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO events (id, name, city, venue, starts_at, expected_attendance, category) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                event.id, event.name, event.city, event.venue, event.starts_at,
                event.expected_attendance, event.category,
            ],
        ).map_err(|e| BlackCardError::Database(format!("Failed to create event: {}", e)))?;
        Ok(event)
    }

    pub fn list_events(&self, city: Option<&str>) -> Result<Vec<Event>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, city, venue, starts_at, expected_attendance, category FROM events WHERE (?1 IS NULL OR city = ?1 COLLATE NOCASE) ORDER BY starts_at ASC"
        ).map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map(rusqlite::params![city], |row: &rusqlite::Row| {
            Ok(Event {
                id: row.get(0)?,
                name: row.get(1)?,
                city: row.get(2)?,
                venue: row.get(3)?,
                starts_at: row.get(4)?,
                expected_attendance: row.get(5)?,
                category: row.get(6)?,
            })
        }).map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }

    pub fn create_venue_monitor(&self, new: &NewVenueMonitor) -> Result<VenueMonitor, BlackCardError> {
        reqwest::Url::parse(&new.url)
            .map_err(|e| BlackCardError::Validation(format!("Invalid monitor url '{}': {}", new.url, e)))?;
        let monitor = VenueMonitor {
            id: new_id(),
            name: new.name.clone(),
            city: new.city.clone(),
            category: new.category.clone(),
            url: new.url.clone(),
            active: true,
            last_checked_at: None,
        };
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO venue_monitors (id, name, city, category, url, active) VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            rusqlite::params![monitor.id, monitor.name, monitor.city, monitor.category, monitor.url],
        ).map_err(|e| BlackCardError::Database(format!("Failed to create monitor: {}", e)))?;
        Ok(monitor)
    }

    pub fn list_venue_monitors(&self) -> Result<Vec<VenueMonitor>, BlackCardError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, city, category, url, active, last_checked_at FROM venue_monitors ORDER BY city, name"
        ).map_err(|e| BlackCardError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok(VenueMonitor {
                id: row.get(0)?,
                name: row.get(1)?,
                city: row.get(2)?,
                category: row.get(3)?,
                url: row.get(4)?,
                active: row.get::<_, i64>(5)? != 0,
                last_checked_at: row.get(6)?,
            })
        }).map_err(|e| BlackCardError::Database(format!("Query error: {}", e)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| BlackCardError::Database(format!("Row error: {}", e)))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hiring(city: &str, category: Option<&str>, strength: Option<i64>) -> NewIntentSignal {
        NewIntentSignal {
            city: city.to_string(),
            category: category.map(str::to_string),
            title: "Busca recepcionista bilingüe".to_string(),
            description: None,
            source: Some("computrabajo".to_string()),
            url: None,
            strength,
            details: IntentDetails::Hiring { role: "receptionist".into(), posting_url: None },
        }
    }

    #[test]
    fn test_db_intent_signal_roundtrip() {
        let db = Database::in_memory().unwrap();
        let created = db.create_intent_signal(&hiring("Cartagena", Some("hotel"), Some(80))).unwrap();
        assert_eq!(created.kind, "hiring");

        let listed = db.list_intent_signals(&IntentFilter::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].details, IntentDetails::Hiring { role: "receptionist".into(), posting_url: None });
        assert_eq!(listed[0].strength, 80);
    }

    #[test]
    fn test_db_intent_filter_matches_city_and_uncategorized() {
        let db = Database::in_memory().unwrap();
        db.create_intent_signal(&hiring("Cartagena", Some("hotel"), None)).unwrap();
        db.create_intent_signal(&hiring("Cartagena", None, None)).unwrap();
        db.create_intent_signal(&hiring("Cartagena", Some("bar"), None)).unwrap();
        db.create_intent_signal(&hiring("Bogotá", Some("hotel"), None)).unwrap();

        let hotels = db.list_intent_signals(&IntentFilter {
            city: Some("cartagena".into()),
            category: Some("hotel".into()),
            ..Default::default()
        }).unwrap();
        assert_eq!(hotels.len(), 2);
        assert!(hotels.iter().all(|s| s.strength == DEFAULT_STRENGTH));
    }

    #[test]
    fn test_db_intent_strength_bounds() {
        let db = Database::in_memory().unwrap();
        let result = db.create_intent_signal(&hiring("Cali", None, Some(150)));
        assert!(matches!(result, Err(BlackCardError::Validation(_))));
    }

    #[test]
    fn test_db_delete_intent_signal() {
        let db = Database::in_memory().unwrap();
        let s = db.create_intent_signal(&hiring("Cali", None, None)).unwrap();
        assert!(db.delete_intent_signal(&s.id).unwrap());
        assert!(!db.delete_intent_signal(&s.id).unwrap());
    }

    #[test]
    fn test_db_events_sorted_by_start() {
        let db = Database::in_memory().unwrap();
        for (name, starts) in [("Hay Festival", "2027-01-28T10:00:00Z"), ("Festival de Cine", "2026-11-03T18:00:00Z")] {
            db.create_event(&NewEvent {
                name: name.into(),
                city: "Cartagena".into(),
                venue: None,
                starts_at: starts.into(),
                expected_attendance: Some(5000),
                category: None,
            }).unwrap();
        }
        let events = db.list_events(Some("Cartagena")).unwrap();
        assert_eq!(events[0].name, "Festival de Cine");
        assert!(db.list_events(Some("Medellín")).unwrap().is_empty());
        assert_eq!(db.list_events(None).unwrap().len(), 2);
    }

    #[test]
    fn test_db_event_rejects_bad_timestamp() {
        let db = Database::in_memory().unwrap();
        let result = db.create_event(&NewEvent {
            name: "x".into(),
            city: "Cali".into(),
            venue: None,
            starts_at: "next friday".into(),
            expected_attendance: None,
            category: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_db_venue_monitors() {
        let db = Database::in_memory().unwrap();
        db.create_venue_monitor(&NewVenueMonitor {
            name: "Café del Mar".into(),
            city: "Cartagena".into(),
            category: Some("bar".into()),
            url: "https://instagram.com/cafedelmar".into(),
        }).unwrap();
        let monitors = db.list_venue_monitors().unwrap();
        assert_eq!(monitors.len(), 1);
        assert!(monitors[0].active);

        assert!(db.create_venue_monitor(&NewVenueMonitor {
            name: "bad".into(),
            city: "Cali".into(),
            category: None,
            url: "not a url".into(),
        }).is_err());
    }
}
