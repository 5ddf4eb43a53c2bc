use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analyses (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            owner              TEXT NOT NULL,
            job_text           TEXT NOT NULL DEFAULT '',
            extracted_text     TEXT NOT NULL DEFAULT '',
            image_path         TEXT,
            score              INTEGER NOT NULL,
            status             TEXT NOT NULL,
            reasons            TEXT, -- JSON
            ai_confidence      INTEGER NOT NULL DEFAULT 0,
            has_critical_flags INTEGER NOT NULL DEFAULT 0,
            critical_reason    TEXT,
            rule_based_score   INTEGER NOT NULL DEFAULT 0,
            ai_score           INTEGER NOT NULL DEFAULT 0,
            created_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_analyses_owner_created ON analyses(owner, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_analyses_score ON analyses(score DESC);
        ",
    )?;
    Ok(())
}
