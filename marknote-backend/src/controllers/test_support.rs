//! Shared fixtures for route tests

use actix_web::web;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use crate::db::Database;
use crate::grammar::fake::FakeChecker;
use crate::notes::NoteService;
use crate::storage::DocumentStore;
use crate::AppState;

pub const MAX_UPLOAD: usize = 64 * 1024;
pub const BOUNDARY: &str = "----marknote-test-boundary";

/// App state over an in-memory database, a temp media dir and the fake checker
pub fn test_state() -> (TempDir, web::Data<AppState>) {
    let dir = tempdir().unwrap();
    let notes = NoteService::new(
        Arc::new(Database::in_memory().unwrap()),
        DocumentStore::new(dir.path().join("media")),
        Arc::new(FakeChecker::default()),
        MAX_UPLOAD,
    );
    let state = web::Data::new(AppState {
        notes,
        max_upload_bytes: MAX_UPLOAD,
        started_at: std::time::Instant::now(),
    });
    (dir, state)
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Build a multipart body with an optional `document` file and `filename` field
pub fn multipart_body(document: Option<(&str, &[u8])>, filename: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((name, bytes)) = document {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{}\"\r\nContent-Type: text/markdown\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(filename) = filename {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"filename\"\r\n\r\n{}\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
