pub mod schema;

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::core::AnalysisResult;

/// A persisted analysis from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub owner: String,
    pub job_text: String,
    pub extracted_text: String,
    pub image_path: Option<String>,
    pub score: u8,
    pub status: String,
    pub reasons: Vec<String>,
    pub ai_confidence: u8,
    pub has_critical_flags: bool,
    pub critical_reason: Option<String>,
    pub rule_based_score: u8,
    pub ai_score: u8,
    pub created_at: String,
}

/// Input for inserting a new analysis.
pub struct NewAnalysis<'a> {
    pub owner: &'a str,
    pub job_text: &'a str,
    pub extracted_text: &'a str,
    pub image_path: Option<&'a str>,
    pub result: &'a AnalysisResult,
}

/// Page descriptor for history listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub limit: usize,
}

pub struct Database {
    conn: Connection,
}

/// Thread-safe wrapper around Database.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let db = Database::open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(db)),
        })
    }

    /// Store an analysis, returning its row id.
    pub fn save_analysis(&self, new: &NewAnalysis<'_>) -> Result<i64, rusqlite::Error> {
        let db = self.inner.lock().unwrap();
        db.save_analysis(new)
    }

    /// Page through an owner's analyses, newest first.
    pub fn list_analyses(
        &self,
        owner: &str,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<AnalysisRecord>, Pagination), rusqlite::Error> {
        let db = self.inner.lock().unwrap();
        db.list_analyses(owner, page, limit)
    }

    /// Fetch a single analysis by id, scoped to its owner.
    pub fn get_analysis(&self, owner: &str, id: i64) -> Result<Option<AnalysisRecord>, rusqlite::Error> {
        let db = self.inner.lock().unwrap();
        db.get_analysis(owner, id)
    }

    /// Delete an analysis. Returns false when it doesn't exist or belongs to
    /// another owner.
    pub fn delete_analysis(&self, owner: &str, id: i64) -> Result<bool, rusqlite::Error> {
        let db = self.inner.lock().unwrap();
        db.delete_analysis(owner, id)
    }

    /// Total analyses stored for an owner.
    pub fn count_analyses(&self, owner: &str) -> Result<usize, rusqlite::Error> {
        let db = self.inner.lock().unwrap();
        db.count_analyses(owner)
    }
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    pub fn save_analysis(&self, new: &NewAnalysis<'_>) -> Result<i64, rusqlite::Error> {
        let result = new.result;
        let reasons_json =
            serde_json::to_string(&result.reasons).unwrap_or_else(|_| "[]".to_string());
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(
            "INSERT INTO analyses (owner, job_text, extracted_text, image_path, score, status, reasons, ai_confidence, has_critical_flags, critical_reason, rule_based_score, ai_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                new.owner,
                new.job_text,
                new.extracted_text,
                new.image_path,
                result.score,
                result.status.as_str(),
                reasons_json,
                result.ai_confidence,
                result.has_critical_flags as i32,
                result.critical_reason,
                result.breakdown.rule_based_score,
                result.breakdown.ai_score,
                created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AnalysisRecord> {
        let reasons_json: Option<String> = row.get(7)?;
        let critical: i32 = row.get(9)?;
        Ok(AnalysisRecord {
            id: row.get(0)?,
            owner: row.get(1)?,
            job_text: row.get(2)?,
            extracted_text: row.get(3)?,
            image_path: row.get(4)?,
            score: row.get::<_, i64>(5)? as u8,
            status: row.get(6)?,
            reasons: reasons_json
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_default(),
            ai_confidence: row.get::<_, i64>(8)? as u8,
            has_critical_flags: critical != 0,
            critical_reason: row.get(10)?,
            rule_based_score: row.get::<_, i64>(11)? as u8,
            ai_score: row.get::<_, i64>(12)? as u8,
            created_at: row.get(13)?,
        })
    }

    const RECORD_COLUMNS: &'static str = "id, owner, job_text, extracted_text, image_path, score, status, reasons, ai_confidence, has_critical_flags, critical_reason, rule_based_score, ai_score, created_at";

    pub fn list_analyses(
        &self,
        owner: &str,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<AnalysisRecord>, Pagination), rusqlite::Error> {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = self.count_analyses(owner)?;
        let offset = (page - 1) * limit;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM analyses WHERE owner = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
            Self::RECORD_COLUMNS
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![owner, limit as i64, offset as i64],
            Self::row_to_record,
        )?;
        let records: Vec<AnalysisRecord> = rows.collect::<Result<_, _>>()?;

        Ok((
            records,
            Pagination {
                total,
                page,
                pages: total.div_ceil(limit),
                limit,
            },
        ))
    }

    pub fn get_analysis(&self, owner: &str, id: i64) -> Result<Option<AnalysisRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM analyses WHERE owner = ?1 AND id = ?2",
            Self::RECORD_COLUMNS
        ))?;
        let mut rows = stmt.query_map(rusqlite::params![owner, id], Self::row_to_record)?;
        rows.next().transpose()
    }

    pub fn delete_analysis(&self, owner: &str, id: i64) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "DELETE FROM analyses WHERE owner = ?1 AND id = ?2",
            rusqlite::params![owner, id],
        )?;
        Ok(changed > 0)
    }

    pub fn count_analyses(&self, owner: &str) -> Result<usize, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM analyses WHERE owner = ?1",
            rusqlite::params![owner],
            |row| row.get::<_, i64>(0).map(|c| c as usize),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Breakdown, Verdict, WeightSplit};
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn open_temp_db() -> SharedDatabase {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "jobradar_test_{}_{}.db",
            std::process::id(),
            id
        ));
        // Remove if leftover from previous run
        let _ = std::fs::remove_file(&path);
        SharedDatabase::open(&path).unwrap()
    }

    fn make_result(score: u8, critical: bool) -> AnalysisResult {
        AnalysisResult {
            score,
            status: Verdict::from_score(score, critical),
            reasons: vec!["reason one".to_string(), "reason two".to_string()],
            ai_confidence: if critical { 100 } else { 60 },
            has_critical_flags: critical,
            critical_reason: critical.then(|| "Payment or fee requirement detected".to_string()),
            breakdown: Breakdown {
                rule_based_score: score,
                ai_score: 0,
                weights: WeightSplit {
                    rule_based: "60%".to_string(),
                    ai: "40%".to_string(),
                },
            },
        }
    }

    fn save(db: &SharedDatabase, owner: &str, score: u8, critical: bool) -> i64 {
        db.save_analysis(&NewAnalysis {
            owner,
            job_text: "job text",
            extracted_text: "",
            image_path: None,
            result: &make_result(score, critical),
        })
        .unwrap()
    }

    #[test]
    fn save_and_get_roundtrip() {
        let db = open_temp_db();
        let id = save(&db, "alice", 100, true);

        let record = db.get_analysis("alice", id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.owner, "alice");
        assert_eq!(record.score, 100);
        assert_eq!(record.status, "Potential Scam");
        assert_eq!(record.reasons, vec!["reason one", "reason two"]);
        assert!(record.has_critical_flags);
        assert_eq!(
            record.critical_reason.as_deref(),
            Some("Payment or fee requirement detected")
        );
    }

    #[test]
    fn get_is_owner_scoped() {
        let db = open_temp_db();
        let id = save(&db, "alice", 40, false);
        assert!(db.get_analysis("bob", id).unwrap().is_none());
        assert!(db.get_analysis("alice", id).unwrap().is_some());
    }

    #[test]
    fn get_missing_returns_none() {
        let db = open_temp_db();
        assert!(db.get_analysis("alice", 12345).unwrap().is_none());
    }

    #[test]
    fn list_pages_newest_first() {
        let db = open_temp_db();
        for score in [10, 20, 30, 40, 50] {
            save(&db, "alice", score, false);
        }

        let (page1, pagination) = db.list_analyses("alice", 1, 2).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(pagination.total, 5);
        assert_eq!(pagination.pages, 3);
        assert_eq!(pagination.limit, 2);
        // Same created_at second is possible; id order breaks the tie.
        assert_eq!(page1[0].score, 50);
        assert_eq!(page1[1].score, 40);

        let (page3, _) = db.list_analyses("alice", 3, 2).unwrap();
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].score, 10);
    }

    #[test]
    fn list_out_of_range_page_is_empty() {
        let db = open_temp_db();
        save(&db, "alice", 10, false);
        let (records, pagination) = db.list_analyses("alice", 9, 10).unwrap();
        assert!(records.is_empty());
        assert_eq!(pagination.total, 1);
        assert_eq!(pagination.pages, 1);
    }

    #[test]
    fn list_zero_page_clamps_to_first() {
        let db = open_temp_db();
        save(&db, "alice", 10, false);
        let (records, pagination) = db.list_analyses("alice", 0, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(pagination.page, 1);
    }

    #[test]
    fn list_excludes_other_owners() {
        let db = open_temp_db();
        save(&db, "alice", 10, false);
        save(&db, "bob", 20, false);
        let (records, pagination) = db.list_analyses("alice", 1, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(pagination.total, 1);
        assert_eq!(records[0].owner, "alice");
    }

    #[test]
    fn delete_is_owner_scoped() {
        let db = open_temp_db();
        let id = save(&db, "alice", 10, false);
        assert!(!db.delete_analysis("bob", id).unwrap());
        assert!(db.delete_analysis("alice", id).unwrap());
        assert!(!db.delete_analysis("alice", id).unwrap());
        assert_eq!(db.count_analyses("alice").unwrap(), 0);
    }

    #[test]
    fn count_empty_owner() {
        let db = open_temp_db();
        assert_eq!(db.count_analyses("nobody").unwrap(), 0);
    }

    #[test]
    fn reasons_survive_json_roundtrip() {
        let db = open_temp_db();
        let mut result = make_result(30, false);
        result.reasons = vec!["quoted \"reason\"".to_string(), "unicode ₹500".to_string()];
        let id = db
            .save_analysis(&NewAnalysis {
                owner: "alice",
                job_text: "",
                extracted_text: "",
                image_path: Some("shot.png"),
                result: &result,
            })
            .unwrap();
        let record = db.get_analysis("alice", id).unwrap().unwrap();
        assert_eq!(record.reasons, result.reasons);
        assert_eq!(record.image_path.as_deref(), Some("shot.png"));
    }
}
