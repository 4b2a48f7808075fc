//! Notes — uploaded markdown documents, their rendering and grammar reports

pub mod service;

pub use service::{GrammarReport, GrammarTarget, NoteService};
