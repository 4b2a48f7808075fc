//! In-process checker for tests: flags words from a fixed misspelling table.

use async_trait::async_trait;
use marknote_types::GrammarIssue;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GrammarChecker, GrammarError};

const MISSPELLINGS: &[(&str, &[&str])] = &[
    ("eror", &["error", "Eros"]),
    ("teh", &["the"]),
    ("recieve", &["receive"]),
];

#[derive(Default)]
pub struct FakeChecker {
    calls: AtomicUsize,
}

impl FakeChecker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrammarChecker for FakeChecker {
    fn language(&self) -> &str {
        "en-US"
    }

    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let chars: Vec<char> = text.chars().collect();
        let mut issues = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            if !chars[start].is_alphabetic() {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < chars.len() && chars[end].is_alphabetic() {
                end += 1;
            }
            let word: String = chars[start..end].iter().collect::<String>().to_lowercase();
            if let Some((_, replacements)) = MISSPELLINGS.iter().find(|(w, _)| *w == word) {
                issues.push(GrammarIssue {
                    message: "Possible spelling mistake found.".to_string(),
                    context: text.to_string(),
                    offset: start,
                    length: end - start,
                    replacements: replacements.iter().map(|r| r.to_string()).collect(),
                });
            }
            start = end;
        }
        Ok(issues)
    }
}

/// Checker whose service is always down
pub struct FailingChecker;

#[async_trait]
impl GrammarChecker for FailingChecker {
    fn language(&self) -> &str {
        "en-US"
    }

    async fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        Err(GrammarError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}
