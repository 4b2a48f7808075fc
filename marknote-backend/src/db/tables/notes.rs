//! Note record operations

use chrono::{DateTime, SecondsFormat, Utc};
use marknote_types::ReportEntry;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

use crate::models::Note;
use super::super::Database;

const NOTE_COLUMNS: &str = "id, filename, document, markdown_text, created_at, report_issues";

impl Database {
    /// Insert a note; `id` and `created_at` are assigned here
    pub fn create_note(
        &self,
        filename: &str,
        document: Option<&str>,
        markdown_text: &str,
        report_issues: &[ReportEntry],
    ) -> SqliteResult<Note> {
        let conn = self.conn();
        let now = Utc::now();
        let issues_json = encode_issues(report_issues)?;

        conn.execute(
            "INSERT INTO notes (filename, document, markdown_text, created_at, report_issues)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                filename,
                document,
                markdown_text,
                now.to_rfc3339_opts(SecondsFormat::Micros, true),
                issues_json,
            ],
        )?;

        Ok(Note {
            id: conn.last_insert_rowid(),
            filename: filename.to_string(),
            document: document.map(|s| s.to_string()),
            markdown_text: markdown_text.to_string(),
            created_at: now,
            report_issues: report_issues.to_vec(),
        })
    }

    pub fn get_note(&self, id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
            [id],
            Self::row_to_note,
        )
        .optional()
    }

    /// All notes, newest first
    pub fn list_notes(&self) -> SqliteResult<Vec<Note>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes ORDER BY created_at DESC, id DESC",
            NOTE_COLUMNS
        ))?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(notes)
    }

    /// Replace the grammar report of a note. Returns false if the note is gone.
    pub fn update_report_issues(&self, id: i64, report_issues: &[ReportEntry]) -> SqliteResult<bool> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE notes SET report_issues = ?1 WHERE id = ?2",
            params![encode_issues(report_issues)?, id],
        )?;
        Ok(updated > 0)
    }

    pub fn delete_note(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn();
        let deleted = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Delete every note and reset the id sequence in one transaction.
    ///
    /// Returns the number of rows removed and the document paths they
    /// referenced, so the caller can clean up blobs afterwards.
    pub fn delete_all_notes(&self) -> SqliteResult<(usize, Vec<String>)> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let documents = {
            let mut stmt = tx.prepare("SELECT document FROM notes WHERE document IS NOT NULL")?;
            let paths = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<SqliteResult<Vec<_>>>()?;
            paths
        };

        let count = tx.execute("DELETE FROM notes", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'notes'", [])?;
        tx.commit()?;

        Ok((count, documents))
    }

    fn row_to_note(row: &Row) -> SqliteResult<Note> {
        let created_at_str: String = row.get(4)?;
        let issues_json: String = row.get(5)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);
        let report_issues: Vec<ReportEntry> = serde_json::from_str(&issues_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        Ok(Note {
            id: row.get(0)?,
            filename: row.get(1)?,
            document: row.get(2)?,
            markdown_text: row.get(3)?,
            created_at,
            report_issues,
        })
    }
}

fn encode_issues(report_issues: &[ReportEntry]) -> SqliteResult<String> {
    serde_json::to_string(report_issues).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
