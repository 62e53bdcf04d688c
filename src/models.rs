use serde::{Deserialize, Serialize};

/// An activity record as persisted by the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    pub source: String,
    pub name: String,
    pub normalized_activity: f64,
    pub created_at: String,
}

/// Manually entered record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub normalized_activity: f64,
}
