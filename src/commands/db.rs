use crate::models::bubble::{Bubble, BubbleRecord};
use crate::models::stats::{ReadDepth, ReadingDay};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

const DB_SCHEMA_VERSION: i64 = 1;

const BUBBLE_COLUMNS: &str =
    "id, content, title, parent_id, topic, owner_id, created_at, pos_x, pos_y";

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("state.db schema v{version} is newer than this build (v{DB_SCHEMA_VERSION})");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bubbles (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            title TEXT,
            parent_id TEXT,
            topic TEXT NOT NULL DEFAULT 'general',
            owner_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            pos_x REAL NOT NULL,
            pos_y REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reading_log (
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            shallow INTEGER NOT NULL DEFAULT 0,
            medium INTEGER NOT NULL DEFAULT 0,
            deep INTEGER NOT NULL DEFAULT 0,
            saved INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (owner_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_bubbles_owner_created ON bubbles(owner_id, created_ts);
        CREATE INDEX IF NOT EXISTS idx_bubbles_parent ON bubbles(parent_id);
        ",
    )
}

pub fn get_db_connection(data_dir: &str) -> Result<Connection> {
    let db_path = crate::commands::settings::app_dir(data_dir).join("state.db");
    let conn = Connection::open(db_path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

pub fn insert_bubble(conn: &Connection, bubble: &Bubble) -> Result<()> {
    conn.execute(
        "INSERT INTO bubbles (id, content, title, parent_id, topic, owner_id, created_at, created_ts, pos_x, pos_y)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            bubble.id,
            bubble.content,
            bubble.title,
            bubble.parent_id,
            bubble.topic,
            bubble.owner_id,
            bubble.created_at.to_rfc3339(),
            bubble.created_at.timestamp(),
            bubble.pos_x,
            bubble.pos_y,
        ],
    )?;
    Ok(())
}

pub fn bubble_exists(conn: &Connection, id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM bubbles WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
}

/// All bubbles, oldest first. Rows that fail validation are skipped.
pub fn load_bubbles(conn: &Connection) -> Result<Vec<Bubble>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUBBLE_COLUMNS} FROM bubbles ORDER BY created_ts ASC, id ASC"
    ))?;
    let records = stmt
        .query_map([], row_to_record)?
        .filter_map(|r| r.ok())
        .collect::<Vec<_>>();

    Ok(validate_records(records))
}

pub fn load_bubbles_by_owner(conn: &Connection, owner_id: &str) -> Result<Vec<Bubble>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUBBLE_COLUMNS} FROM bubbles WHERE owner_id = ?1 ORDER BY created_ts ASC, id ASC"
    ))?;
    let records = stmt
        .query_map(params![owner_id], row_to_record)?
        .filter_map(|r| r.ok())
        .collect::<Vec<_>>();

    Ok(validate_records(records))
}

pub fn has_posted_since(conn: &Connection, owner_id: &str, since: DateTime<Utc>) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM bubbles WHERE owner_id = ?1 AND created_ts >= ?2)",
        params![owner_id, since.timestamp()],
        |row| row.get(0),
    )
}

pub fn increment_read(conn: &Connection, owner_id: &str, date: &str, depth: ReadDepth) -> Result<()> {
    let column = match depth {
        ReadDepth::Shallow => "shallow",
        ReadDepth::Medium => "medium",
        ReadDepth::Deep => "deep",
    };
    bump_reading_counter(conn, owner_id, date, column)
}

pub fn increment_saved(conn: &Connection, owner_id: &str, date: &str) -> Result<()> {
    bump_reading_counter(conn, owner_id, date, "saved")
}

fn bump_reading_counter(conn: &Connection, owner_id: &str, date: &str, column: &str) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO reading_log (owner_id, date, {column}) VALUES (?1, ?2, 1)
             ON CONFLICT(owner_id, date) DO UPDATE SET {column} = {column} + 1"
        ),
        params![owner_id, date],
    )?;
    Ok(())
}

pub fn load_reading_day(conn: &Connection, owner_id: &str, date: &str) -> Result<Option<ReadingDay>> {
    conn.query_row(
        "SELECT date, shallow, medium, deep, saved FROM reading_log WHERE owner_id = ?1 AND date = ?2",
        params![owner_id, date],
        row_to_reading_day,
    )
    .optional()
}

pub fn load_reading_log(conn: &Connection, owner_id: &str) -> Result<Vec<ReadingDay>> {
    let mut stmt = conn.prepare(
        "SELECT date, shallow, medium, deep, saved FROM reading_log WHERE owner_id = ?1 ORDER BY date ASC",
    )?;
    let days = stmt
        .query_map(params![owner_id], row_to_reading_day)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(days)
}

fn row_to_record(row: &Row<'_>) -> Result<BubbleRecord> {
    Ok(BubbleRecord {
        id: row.get(0)?,
        content: row.get(1)?,
        title: row.get(2)?,
        parent_id: row.get(3)?,
        topic: row.get(4)?,
        owner_id: row.get(5)?,
        created_at: row.get(6)?,
        pos_x: row.get(7)?,
        pos_y: row.get(8)?,
    })
}

fn row_to_reading_day(row: &Row<'_>) -> Result<ReadingDay> {
    Ok(ReadingDay {
        date: row.get(0)?,
        shallow: row.get::<_, i64>(1)?.max(0) as u32,
        medium: row.get::<_, i64>(2)?.max(0) as u32,
        deep: row.get::<_, i64>(3)?.max(0) as u32,
        saved: row.get::<_, i64>(4)?.max(0) as u32,
    })
}

fn validate_records(records: Vec<BubbleRecord>) -> Vec<Bubble> {
    records
        .into_iter()
        .filter_map(|record| match Bubble::try_from(record) {
            Ok(bubble) => Some(bubble),
            Err(e) => {
                log::warn!("skipping bubble row: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        conn
    }

    fn bubble(id: &str, owner: &str, hour: u32) -> Bubble {
        Bubble {
            id: id.to_string(),
            content: "a small thought".to_string(),
            title: Some("title".to_string()),
            parent_id: None,
            topic: "sea".to_string(),
            owner_id: owner.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap(),
            pos_x: 33.3,
            pos_y: 66.6,
        }
    }

    #[test]
    fn schema_initializes_with_expected_version() {
        let conn = open();
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, DB_SCHEMA_VERSION);

        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_bubbles_%'",
                [],
                |row| row.get(0),
            )
            .expect("index count");
        assert_eq!(indexes, 2);

        initialize_schema(&conn).expect("second init is a no-op");
    }

    #[test]
    fn bubbles_come_back_validated_and_ordered() {
        let conn = open();
        insert_bubble(&conn, &bubble("late", "me", 15)).expect("insert");
        insert_bubble(&conn, &bubble("early", "me", 8)).expect("insert");
        insert_bubble(&conn, &bubble("other", "them", 9)).expect("insert");

        let all = load_bubbles(&conn).expect("load");
        let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "other", "late"]);
        assert_eq!(all[0], bubble("early", "me", 8));

        assert_eq!(load_bubbles_by_owner(&conn, "me").expect("load").len(), 2);
        assert!(bubble_exists(&conn, "other").expect("exists"));
    }

    #[test]
    fn corrupt_rows_are_skipped() {
        let conn = open();
        insert_bubble(&conn, &bubble("ok", "me", 8)).expect("insert");
        conn.execute(
            "INSERT INTO bubbles (id, content, owner_id, created_at, created_ts, pos_x, pos_y)
             VALUES ('bad', 'x', 'me', 'not-a-date', 0, 250.0, 1.0)",
            [],
        )
        .expect("raw insert");

        let all = load_bubbles(&conn).expect("load");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "ok");
    }

    #[test]
    fn posted_since_respects_cutoff() {
        let conn = open();
        insert_bubble(&conn, &bubble("a", "me", 8)).expect("insert");

        let before = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert!(has_posted_since(&conn, "me", before).expect("query"));
        assert!(!has_posted_since(&conn, "me", after).expect("query"));
        assert!(!has_posted_since(&conn, "them", before).expect("query"));
    }

    #[test]
    fn reading_counters_accumulate_per_day() {
        let conn = open();
        increment_read(&conn, "me", "2026-03-02", ReadDepth::Deep).expect("read");
        increment_read(&conn, "me", "2026-03-02", ReadDepth::Deep).expect("read");
        increment_read(&conn, "me", "2026-03-02", ReadDepth::Shallow).expect("read");
        increment_saved(&conn, "me", "2026-03-02").expect("save");
        increment_read(&conn, "me", "2026-03-01", ReadDepth::Medium).expect("read");

        let day = load_reading_day(&conn, "me", "2026-03-02")
            .expect("load")
            .expect("day exists");
        assert_eq!((day.shallow, day.medium, day.deep, day.saved), (1, 0, 2, 1));

        let log = load_reading_log(&conn, "me").expect("log");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].date, "2026-03-01");
        assert!(load_reading_day(&conn, "them", "2026-03-02").expect("load").is_none());
    }
}
