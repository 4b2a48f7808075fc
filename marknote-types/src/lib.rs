//! Shared wire types for the marknote HTTP API and its clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Request Types
// =====================================================

/// Grammar check against ad-hoc text (no note involved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarCheckRequest {
    #[serde(default)]
    pub text: String,
}

// =====================================================
// Response Types
// =====================================================

/// A stored note as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteView {
    pub id: i64,
    pub filename: String,
    /// URL path of the uploaded document, if one is stored
    pub document: Option<String>,
    pub markdown_text: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    pub report_issues: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarResponse {
    pub issues: Vec<GrammarIssue>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// =====================================================
// Domain Types
// =====================================================

/// A single grammar/style finding for a span of text.
///
/// `offset` and `length` are measured in characters of the checked text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub message: String,
    pub context: String,
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    pub replacements: Vec<String>,
}

/// One entry of a note's grammar report.
///
/// A note that has never been checked carries a single `Notice`; after a check
/// the report holds only `Issue` entries (possibly none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Issue(GrammarIssue),
    Notice(String),
}

/// Report stored on freshly uploaded notes
pub const NO_ISSUES_REPORTED: &str = "No issues reported.";

pub fn placeholder_report() -> Vec<ReportEntry> {
    vec![ReportEntry::Notice(NO_ISSUES_REPORTED.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_entries_serialize_untagged() {
        let report = vec![
            ReportEntry::Notice("No issues reported.".to_string()),
            ReportEntry::Issue(GrammarIssue {
                message: "Possible spelling mistake found.".to_string(),
                context: "a eror.".to_string(),
                offset: 2,
                length: 4,
                replacements: vec!["error".to_string()],
            }),
        ];

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json[0], "No issues reported.");
        assert_eq!(json[1]["offset"], 2);
        assert_eq!(json[1]["replacements"][0], "error");

        let back: Vec<ReportEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_issue_length_defaults_to_zero() {
        let issue: GrammarIssue = serde_json::from_str(
            r#"{"message":"m","context":"c","offset":3,"replacements":[]}"#,
        )
        .unwrap();
        assert_eq!(issue.length, 0);
    }

    #[test]
    fn test_error_response_omits_missing_detail() {
        let json = serde_json::to_string(&ErrorResponse::new("Note with ID 7 does not exist.")).unwrap();
        assert!(!json.contains("detail"));

        let json = serde_json::to_string(
            &ErrorResponse::new("No text available").with_detail("file missing"),
        )
        .unwrap();
        assert!(json.contains("\"detail\":\"file missing\""));
    }
}
