// SQLite storage for the local development backend
// The terminal client never touches this; it talks to whatever serves the HTTP API

use crate::model::{Interpretation, InterpretationDraft};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {:?}", path))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (in-memory databases stay "memory")
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    // row_id keeps creation order; id is the opaque identifier clients see
    conn.execute(
        "CREATE TABLE IF NOT EXISTS interpretations (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            term TEXT NOT NULL,
            interpretation TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_interpretations_id ON interpretations(id)",
        [],
    )?;

    Ok(())
}

/// Store a new record under a fresh UUID.
pub fn insert_interpretation(conn: &Connection, draft: &InterpretationDraft) -> Result<Interpretation> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO interpretations (id, term, interpretation, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![id, draft.term, draft.interpretation, now],
    )
    .context("Failed to insert interpretation")?;

    Ok(Interpretation::from_draft(id, draft.clone()))
}

pub fn get_all_interpretations(conn: &Connection) -> Result<Vec<Interpretation>> {
    let mut stmt = conn.prepare(
        "SELECT id, term, interpretation
         FROM interpretations
         ORDER BY row_id ASC",
    )?;

    let records = stmt
        .query_map([], |row| {
            Ok(Interpretation {
                id: row.get(0)?,
                term: row.get(1)?,
                interpretation: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn get_interpretation(conn: &Connection, id: &str) -> Result<Option<Interpretation>> {
    let record = conn
        .query_row(
            "SELECT id, term, interpretation FROM interpretations WHERE id = ?1",
            params![id],
            |row| {
                Ok(Interpretation {
                    id: row.get(0)?,
                    term: row.get(1)?,
                    interpretation: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(record)
}

/// Replace both text fields. Returns `None` when no record has this id.
pub fn update_interpretation(
    conn: &Connection,
    id: &str,
    draft: &InterpretationDraft,
) -> Result<Option<Interpretation>> {
    let changed = conn.execute(
        "UPDATE interpretations
         SET term = ?1, interpretation = ?2, updated_at = ?3
         WHERE id = ?4",
        params![draft.term, draft.interpretation, Utc::now().to_rfc3339(), id],
    )?;

    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(Interpretation::from_draft(id, draft.clone())))
}

/// Returns `false` when no record has this id.
pub fn delete_interpretation(conn: &Connection, id: &str) -> Result<bool> {
    let removed = conn.execute("DELETE FROM interpretations WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM interpretations", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(term: &str, interpretation: &str) -> InterpretationDraft {
        InterpretationDraft::new(term, interpretation)
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let conn = open_in_memory().unwrap();

        let a = insert_interpretation(&conn, &draft("a", "first")).unwrap();
        let b = insert_interpretation(&conn, &draft("b", "second")).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
        assert_eq!(verify_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_list_in_creation_order() {
        let conn = open_in_memory().unwrap();
        for term in ["zeta", "alpha", "mu"] {
            insert_interpretation(&conn, &draft(term, "x")).unwrap();
        }

        let terms: Vec<String> = get_all_interpretations(&conn)
            .unwrap()
            .into_iter()
            .map(|r| r.term)
            .collect();
        assert_eq!(terms, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_get_update_delete() {
        let conn = open_in_memory().unwrap();
        let created = insert_interpretation(&conn, &draft("t", "i")).unwrap();

        let loaded = get_interpretation(&conn, &created.id).unwrap().unwrap();
        assert_eq!(loaded, created);

        let updated = update_interpretation(&conn, &created.id, &draft("t2", "i2"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(
            get_interpretation(&conn, &created.id).unwrap().unwrap().term,
            "t2"
        );

        assert!(delete_interpretation(&conn, &created.id).unwrap());
        assert!(get_interpretation(&conn, &created.id).unwrap().is_none());
        // Second delete finds nothing
        assert!(!delete_interpretation(&conn, &created.id).unwrap());
    }

    #[test]
    fn test_update_missing() {
        let conn = open_in_memory().unwrap();
        assert!(update_interpretation(&conn, "missing", &draft("t", "i"))
            .unwrap()
            .is_none());
        assert!(get_interpretation(&conn, "missing").unwrap().is_none());
    }
}
