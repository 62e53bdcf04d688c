use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::models::StoredRecord;
use crate::services::excel::ExtractionResult;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS activity_records (
    id INTEGER PRIMARY KEY,
    source TEXT NOT NULL,
    name TEXT NOT NULL,
    normalized_activity REAL NOT NULL,
    created_at TEXT NOT NULL
)";

const INSERT_SQL: &str = "INSERT INTO activity_records (source, name, normalized_activity, created_at)
    VALUES (?1, ?2, ?3, ?4)";

/// SQLite-backed storage for extracted activity records.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        info!("Opening record store at {}", path.display());
        let conn = Connection::open(path).map_err(|e| {
            error!("Failed to open database {}: {}", path.display(), e);
            AppError::DatabaseError(e.to_string())
        })?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, AppError> {
        debug!("Opening in-memory record store");
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute(CREATE_TABLE_SQL, []).map_err(|e| {
            error!("Failed to create activity_records table: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, AppError> {
        self.conn.lock().map_err(|e| {
            error!("Failed to acquire database lock: {}", e);
            AppError::DatabaseError(e.to_string())
        })
    }

    /// Stores all records of one extraction in a single transaction.
    pub fn insert_records(&self, source: &str, records: &[ExtractionResult]) -> Result<usize, AppError> {
        let mut conn = self.lock()?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_SQL)?;
            for record in records {
                stmt.execute(params![source, record.name, record.normalized_activity, created_at])?;
            }
        }
        tx.commit()?;

        info!("Stored {} records from {}", records.len(), source);
        Ok(records.len())
    }

    pub fn insert_record(&self, source: &str, record: &ExtractionResult) -> Result<i64, AppError> {
        let conn = self.lock()?;
        conn.execute(
            INSERT_SQL,
            params![source, record.name, record.normalized_activity, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All stored records, oldest first.
    pub fn list_records(&self) -> Result<Vec<StoredRecord>, AppError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, source, name, normalized_activity, created_at FROM activity_records ORDER BY id",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    source: row.get(1)?,
                    name: row.get(2)?,
                    normalized_activity: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Listed {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, normalized_activity: f64) -> ExtractionResult {
        ExtractionResult {
            name: name.to_string(),
            normalized_activity,
        }
    }

    #[test]
    fn stores_and_lists_records_in_insertion_order() {
        let store = RecordStore::in_memory().unwrap();
        let inserted = store
            .insert_records("run1.xlsx", &[result("pcdna", 1.5), result("wt", 2.0)])
            .unwrap();
        assert_eq!(inserted, 2);

        let id = store.insert_record("manual", &result("blank", 0.0)).unwrap();
        assert_eq!(id, 3);

        let records = store.list_records().unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["pcdna", "wt", "blank"]);
        assert_eq!(records[0].source, "run1.xlsx");
        assert_eq!(records[1].normalized_activity, 2.0);
        assert_eq!(records[2].source, "manual");
    }

    #[test]
    fn empty_batch_stores_nothing() {
        let store = RecordStore::in_memory().unwrap();
        assert_eq!(store.insert_records("empty.csv", &[]).unwrap(), 0);
        assert!(store.list_records().unwrap().is_empty());
    }
}
