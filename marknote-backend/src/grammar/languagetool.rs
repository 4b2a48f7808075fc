//! Typed HTTP client for a LanguageTool server (`/v2/check`).

use async_trait::async_trait;
use marknote_types::GrammarIssue;
use serde::Deserialize;

use super::{GrammarChecker, GrammarError};
use crate::config::GrammarConfig;

pub struct LanguageToolClient {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

// ── LanguageTool API types ──────────────────────────

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Debug, Deserialize)]
struct LtMatch {
    #[serde(default)]
    message: String,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    offset: usize,
    #[serde(default)]
    length: Option<usize>,
    #[serde(default)]
    context: Option<LtContext>,
}

#[derive(Debug, Deserialize)]
struct LtReplacement {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct LtContext {
    #[serde(default)]
    text: String,
}

// ── Client impl ─────────────────────────────────────

impl LanguageToolClient {
    pub fn new(config: &GrammarConfig) -> Result<Self, GrammarError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.languagetool_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client,
        })
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    fn language(&self) -> &str {
        &self.language
    }

    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        let resp = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GrammarError::Status { status, body });
        }

        let parsed: CheckResponse = resp
            .json()
            .await
            .map_err(|e| GrammarError::InvalidResponse(e.to_string()))?;

        Ok(to_issues(text, parsed.matches))
    }
}

/// Convert LanguageTool matches to issues.
///
/// LanguageTool reports positions in UTF-16 code units; issues use characters.
fn to_issues(text: &str, matches: Vec<LtMatch>) -> Vec<GrammarIssue> {
    let positions = Utf16ToChar::new(text);
    matches
        .into_iter()
        .map(|m| {
            let offset = positions.char_index(m.offset);
            let length = m
                .length
                .map(|len| positions.char_index(m.offset + len) - offset)
                .unwrap_or(0);
            GrammarIssue {
                message: m.message,
                context: m.context.map(|c| c.text).unwrap_or_default(),
                offset,
                length,
                replacements: m.replacements.into_iter().map(|r| r.value).collect(),
            }
        })
        .collect()
}

/// Maps UTF-16 offsets of a string to char offsets
struct Utf16ToChar {
    /// Cumulative UTF-16 length before each char, plus the total at the end
    boundaries: Vec<usize>,
}

impl Utf16ToChar {
    fn new(text: &str) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        let mut units = 0;
        for c in text.chars() {
            boundaries.push(units);
            units += c.len_utf16();
        }
        boundaries.push(units);
        Self { boundaries }
    }

    fn char_index(&self, utf16_offset: usize) -> usize {
        match self.boundaries.binary_search(&utf16_offset) {
            Ok(idx) => idx,
            // Offset inside a surrogate pair (or past the end): clamp to the char start
            Err(idx) => idx.saturating_sub(1),
        }
    }
}
