//! Tracker record persistence
//!
//! Optional SQLite store for synced tracker records. When no database is
//! configured the store is disabled: inserts echo the record back without
//! persisting and patient queries return an empty page.

use crate::error::{Error, Result};
use aftercare_common::model::TrackerRecord;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

/// Persistence adapter around an optional SQLite pool
#[derive(Debug, Clone)]
pub struct TrackerStore {
    pool: Option<SqlitePool>,
}

impl TrackerStore {
    /// Connect to the database and create the schema if needed
    ///
    /// `database_url` is a sqlite URL (`sqlite:///path/to/aftercare.db`);
    /// `?mode=rwc` is appended so a first run creates the file.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = if database_url.contains('?') {
            database_url.to_string()
        } else {
            format!("{database_url}?mode=rwc")
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await?;
        create_schema(&pool).await?;
        info!("Connected to tracker database");
        Ok(Self { pool: Some(pool) })
    }

    /// In-memory database (tests)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePool::connect(":memory:").await?;
        create_schema(&pool).await?;
        Ok(Self { pool: Some(pool) })
    }

    /// Store with persistence disabled
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Insert a record, assigning a fresh id
    ///
    /// Without a database the record still gets an id and is returned
    /// as-if created, but is never queryable later.
    pub async fn insert(&self, record: &TrackerRecord) -> Result<TrackerRecord> {
        let mut stored = record.clone();
        stored.id = Some(Uuid::new_v4());

        let Some(pool) = &self.pool else {
            info!(patient_id = %stored.patient_id, "Tracker saved (memory only, no database)");
            return Ok(stored);
        };

        sqlx::query(
            r#"
            INSERT INTO tracker_records
                (id, patient_id, procedure_type, symptoms, notes, pain_level,
                 medications, timestamp, follow_up_needed, warning_signs_present)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(stored.id.map(|id| id.to_string()))
        .bind(&stored.patient_id)
        .bind(&stored.procedure_type)
        .bind(serde_json::to_string(&stored.symptoms).map_err(|e| Error::Internal(e.to_string()))?)
        .bind(&stored.notes)
        .bind(stored.pain_level)
        .bind(
            serde_json::to_string(&stored.medications)
                .map_err(|e| Error::Internal(e.to_string()))?,
        )
        .bind(stored.timestamp)
        .bind(stored.follow_up_needed)
        .bind(stored.warning_signs_present)
        .execute(pool)
        .await?;

        Ok(stored)
    }

    /// Reverse-chronological page of one patient's records
    ///
    /// Returns an empty list when persistence is disabled.
    pub async fn list(&self, patient_id: &str, limit: i64, offset: i64) -> Result<Vec<TrackerRecord>> {
        let Some(pool) = &self.pool else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT id, patient_id, procedure_type, symptoms, notes, pain_level,
                   medications, timestamp, follow_up_needed, warning_signs_present
            FROM tracker_records
            WHERE patient_id = ?
            ORDER BY timestamp DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(patient_id)
        .bind(limit.max(0))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.get("id");
                let symptoms: String = row.get("symptoms");
                let medications: String = row.get("medications");
                let timestamp: DateTime<Utc> = row.get("timestamp");
                Ok(TrackerRecord {
                    id: Uuid::parse_str(&id).ok(),
                    patient_id: row.get("patient_id"),
                    procedure_type: row.get("procedure_type"),
                    symptoms: serde_json::from_str(&symptoms)
                        .map_err(|e| Error::Internal(format!("corrupt symptoms column: {e}")))?,
                    notes: row.get("notes"),
                    pain_level: row.get("pain_level"),
                    medications: serde_json::from_str(&medications)
                        .map_err(|e| Error::Internal(format!("corrupt medications column: {e}")))?,
                    timestamp,
                    follow_up_needed: row.get("follow_up_needed"),
                    warning_signs_present: row.get("warning_signs_present"),
                })
            })
            .collect()
    }
}

/// Create the tracker table and its query indexes (idempotent)
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracker_records (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            procedure_type TEXT NOT NULL,
            symptoms TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            pain_level REAL,
            medications TEXT NOT NULL DEFAULT '[]',
            timestamp TEXT NOT NULL,
            follow_up_needed INTEGER NOT NULL DEFAULT 0,
            warning_signs_present INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_tracker_patient ON tracker_records(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_tracker_timestamp ON tracker_records(timestamp DESC)",
        "CREATE INDEX IF NOT EXISTS idx_tracker_procedure ON tracker_records(procedure_type)",
        "CREATE INDEX IF NOT EXISTS idx_tracker_warning ON tracker_records(warning_signs_present)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
