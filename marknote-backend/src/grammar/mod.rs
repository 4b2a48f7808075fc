//! Grammar checking
//!
//! The checker is created once at startup and shared by every request as an
//! `Arc<dyn GrammarChecker>`. Implementations hold no per-request state.

mod languagetool;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use marknote_types::GrammarIssue;
use thiserror::Error;

pub use languagetool::LanguageToolClient;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("grammar service unavailable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("grammar service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid grammar service response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Locale every check runs against (e.g. "en-US")
    fn language(&self) -> &str;

    /// Issues found in `text`, in the order the checker reports them.
    /// Offsets and lengths count characters of `text`.
    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError>;
}
