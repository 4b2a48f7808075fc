//! Notes REST API
//!
//! - `GET    /notes/`               list all notes, newest first
//! - `POST   /notes/`               upload a markdown file (multipart: `document`, optional `filename`)
//! - `DELETE /notes/`               delete every note and its stored document
//! - `GET    /notes/{id}/`          fetch one note
//! - `DELETE /notes/{id}/`          delete one note and its stored document
//! - `GET    /notes/{id}/render/`   render the note's markdown to HTML
//! - `POST   /notes/{id}/grammar/`  grammar-check the note and store the report

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use marknote_types::{GrammarResponse, MessageResponse, NoteView, RenderResponse};

use crate::error::NoteError;
use crate::models::Upload;
use crate::notes::GrammarTarget;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("/", web::get().to(list_notes))
            .route("/", web::post().to(create_note))
            .route("/", web::delete().to(delete_all_notes))
            .route("/{id}/", web::get().to(get_note))
            .route("/{id}/", web::delete().to(delete_note))
            .route("/{id}/render/", web::get().to(render_note))
            .route("/{id}/grammar/", web::post().to(check_note_grammar)),
    );
}

async fn list_notes(state: web::Data<AppState>) -> Result<HttpResponse, NoteError> {
    let notes: Vec<NoteView> = state.notes.list_notes()?.iter().map(NoteView::from).collect();
    Ok(HttpResponse::Ok().json(notes))
}

async fn get_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, NoteError> {
    let note = state.notes.get_note(path.into_inner())?;
    Ok(HttpResponse::Ok().json(note.to_view()))
}

async fn create_note(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, NoteError> {
    let form = read_upload_form(payload, state.max_upload_bytes).await?;
    let note = state
        .notes
        .create_note(form.filename.as_deref(), form.document)
        .await?;
    Ok(HttpResponse::Created().json(note.to_view()))
}

async fn delete_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, NoteError> {
    state.notes.delete_note(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn delete_all_notes(state: web::Data<AppState>) -> Result<HttpResponse, NoteError> {
    let count = state.notes.delete_all_notes().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!(
            "Successfully deleted all ({}) notes and cleared media files.",
            count
        ),
    }))
}

async fn render_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, NoteError> {
    let html = state.notes.render_note(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RenderResponse { html }))
}

async fn check_note_grammar(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, NoteError> {
    let report = state
        .notes
        .check_grammar(GrammarTarget::Note(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(GrammarResponse {
        issues: report.issues,
        count: report.count,
    }))
}

// --- Multipart upload ---

#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    document: Option<Upload>,
}

/// Collect the `document` file and `filename` text field; other fields are drained.
async fn read_upload_form(mut payload: Multipart, max_bytes: usize) -> Result<UploadForm, NoteError> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| NoteError::InvalidInput(format!("Failed to process upload: {}", e)))?;

        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(|s| s.to_string());

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| NoteError::InvalidInput(format!("Failed to read upload data: {}", e)))?;
            if data.len() + chunk.len() > max_bytes {
                return Err(NoteError::InvalidInput(format!(
                    "Upload rejected: '{}' exceeds the {} byte limit.",
                    name, max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "document" => {
                form.document = Some(Upload {
                    file_name,
                    bytes: data,
                });
            }
            "filename" => {
                form.filename = Some(String::from_utf8_lossy(&data).into_owned());
            }
            other => log::debug!("[NOTES] Ignoring upload field '{}'", other),
        }
    }

    Ok(form)
}
