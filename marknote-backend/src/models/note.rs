use chrono::{DateTime, SecondsFormat, Utc};
use marknote_types::{NoteView, ReportEntry};

/// URL prefix under which the media directory is served
pub const MEDIA_URL: &str = "/media";

/// Note - an uploaded markdown document and its latest grammar report
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub filename: String,
    /// Blob path relative to the media directory (e.g. "documents/ab12_todo.md")
    pub document: Option<String>,
    pub markdown_text: String,
    pub created_at: DateTime<Utc>,
    pub report_issues: Vec<ReportEntry>,
}

impl Note {
    /// Wire representation returned by the HTTP API
    pub fn to_view(&self) -> NoteView {
        NoteView {
            id: self.id,
            filename: self.filename.clone(),
            document: self.document.as_deref().map(document_url),
            markdown_text: self.markdown_text.clone(),
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            report_issues: self.report_issues.clone(),
        }
    }
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        note.to_view()
    }
}

fn document_url(relative: &str) -> String {
    format!("{}/{}", MEDIA_URL, relative.trim_start_matches('/'))
}

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}
