//! NoteService — orchestrates the note table, document blobs, the markdown
//! renderer and the shared grammar checker.

use marknote_types::{placeholder_report, GrammarIssue, ReportEntry};
use std::sync::Arc;

use crate::db::Database;
use crate::error::{NoteError, Result};
use crate::grammar::GrammarChecker;
use crate::models::{Note, Upload};
use crate::render::markdown_to_html;
use crate::storage::DocumentStore;

/// What a grammar check runs against
#[derive(Debug, Clone)]
pub enum GrammarTarget {
    /// A stored note; the resulting issues are saved onto it
    Note(i64),
    /// Ad-hoc text; nothing is persisted
    Text(String),
}

#[derive(Debug, Clone)]
pub struct GrammarReport {
    pub issues: Vec<GrammarIssue>,
    pub count: usize,
}

pub struct NoteService {
    db: Arc<Database>,
    documents: DocumentStore,
    checker: Arc<dyn GrammarChecker>,
    max_upload_bytes: usize,
}

impl NoteService {
    pub fn new(
        db: Arc<Database>,
        documents: DocumentStore,
        checker: Arc<dyn GrammarChecker>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            documents,
            checker,
            max_upload_bytes,
        }
    }

    pub fn grammar_language(&self) -> &str {
        self.checker.language()
    }

    /// All notes, newest first
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.db.list_notes()?)
    }

    pub fn get_note(&self, id: i64) -> Result<Note> {
        self.db.get_note(id)?.ok_or(NoteError::NotFound(id))
    }

    /// Store an uploaded markdown file as a new note.
    ///
    /// `filename` overrides the uploaded file's own name when non-empty.
    pub async fn create_note(&self, filename: Option<&str>, upload: Option<Upload>) -> Result<Note> {
        let upload = upload.ok_or_else(|| {
            NoteError::InvalidInput("No file provided. Expecting field 'document'.".to_string())
        })?;

        if upload.bytes.len() > self.max_upload_bytes {
            return Err(NoteError::InvalidInput(format!(
                "Upload rejected: file size ({} bytes) exceeds the {} byte limit.",
                upload.bytes.len(),
                self.max_upload_bytes
            )));
        }

        let display_name = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(upload.file_name.as_deref())
            .unwrap_or_default()
            .to_string();

        let text = decode_text(&upload.bytes);

        // Held until the row exists so a concurrent delete-all cannot wipe the
        // blob in between.
        let documents = self.documents.shared().await;
        let stored_as = documents
            .save(upload.file_name.as_deref().or(Some(display_name.as_str())), &upload.bytes)
            .await?;

        let note = match self
            .db
            .create_note(&display_name, Some(stored_as.as_str()), &text, &placeholder_report())
        {
            Ok(note) => note,
            Err(e) => {
                if let Err(cleanup) = documents.remove(&stored_as).await {
                    log::warn!("[NOTES] Failed to remove orphaned document {}: {}", stored_as, cleanup);
                }
                return Err(e.into());
            }
        };
        drop(documents);

        log::info!(
            "[NOTES] Created note {} '{}' ({} bytes)",
            note.id,
            note.filename,
            upload.bytes.len()
        );
        Ok(note)
    }

    /// Delete one note and its stored document
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        let note = self.get_note(id)?;

        let documents = self.documents.shared().await;
        if let Some(document) = &note.document {
            documents.remove(document).await?;
        }

        if !self.db.delete_note(id)? {
            return Err(NoteError::NotFound(id));
        }

        log::info!("[NOTES] Deleted note {}", id);
        Ok(())
    }

    /// Delete every note, reset the id sequence and wipe the documents directory.
    /// Returns how many notes were removed.
    pub async fn delete_all_notes(&self) -> Result<usize> {
        // Uploads wait until the rows and the directory are both gone
        let documents = self.documents.exclusive().await;
        let (count, stored) = self.db.delete_all_notes()?;

        // Blobs are derived data: failures here are logged, not reported.
        for document in &stored {
            if let Err(e) = documents.remove(document).await {
                log::warn!("[NOTES] Failed to delete document {}: {}", document, e);
            }
        }
        if let Err(e) = documents.clear().await {
            log::warn!("[NOTES] Failed to remove documents directory: {}", e);
        }
        drop(documents);

        log::info!("[NOTES] Deleted all notes ({})", count);
        Ok(count)
    }

    pub async fn render_note(&self, id: i64) -> Result<String> {
        let note = self.get_note(id)?;
        let text = self.resolve_text(&note).await?;
        Ok(markdown_to_html(&text))
    }

    pub async fn check_grammar(&self, target: GrammarTarget) -> Result<GrammarReport> {
        let (note_id, text) = match target {
            GrammarTarget::Note(id) => {
                let note = self.get_note(id)?;
                (Some(id), self.resolve_text(&note).await?)
            }
            GrammarTarget::Text(text) => (None, text),
        };

        if text.is_empty() {
            return Err(NoteError::InvalidInput(
                "No text provided for grammar check.".to_string(),
            ));
        }

        let issues = self.checker.check(&text).await?;
        log::debug!(
            "[GRAMMAR] {} issue(s) found ({}, {} chars)",
            issues.len(),
            self.checker.language(),
            text.chars().count()
        );

        if let Some(id) = note_id {
            let report: Vec<ReportEntry> = issues.iter().cloned().map(ReportEntry::Issue).collect();
            if !self.db.update_report_issues(id, &report)? {
                return Err(NoteError::NotFound(id));
            }
        }

        let count = issues.len();
        Ok(GrammarReport { issues, count })
    }

    /// The note's markdown text, or the content of its stored document when
    /// the text is empty.
    async fn resolve_text(&self, note: &Note) -> Result<String> {
        if !note.markdown_text.is_empty() {
            return Ok(note.markdown_text.clone());
        }

        let Some(document) = &note.document else {
            return Err(NoteError::RenderSourceUnavailable {
                id: note.id,
                reason: "Note has no markdown text and no stored document.".to_string(),
            });
        };

        match self.documents.read(document).await {
            Ok(bytes) => Ok(decode_text(&bytes)),
            Err(e) => Err(NoteError::RenderSourceUnavailable {
                id: note.id,
                reason: format!("Failed to read document {}: {}", document, e),
            }),
        }
    }
}

/// Decode uploaded bytes as UTF-8, falling back to Latin-1 so that any byte
/// sequence yields text.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
