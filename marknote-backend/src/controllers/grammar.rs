//! Grammar check on ad-hoc text: `POST /grammar/check/` with `{"text": "..."}`.
//! Nothing is stored.

use actix_web::{web, HttpResponse};
use marknote_types::{GrammarCheckRequest, GrammarResponse};

use crate::error::NoteError;
use crate::notes::GrammarTarget;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/grammar/check/").route(web::post().to(check_text)));
}

async fn check_text(
    state: web::Data<AppState>,
    body: web::Json<GrammarCheckRequest>,
) -> Result<HttpResponse, NoteError> {
    let report = state
        .notes
        .check_grammar(GrammarTarget::Text(body.into_inner().text))
        .await?;
    Ok(HttpResponse::Ok().json(GrammarResponse {
        issues: report.issues,
        count: report.count,
    }))
}
