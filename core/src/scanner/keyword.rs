use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Outcome of the keyword pass over a file's text.
///
/// `Failed` is kept apart from an empty match list so a scan that never ran
/// is not reported as clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeywordScan {
    Completed { matches: Vec<String> },
    Failed { reason: String },
}

impl KeywordScan {
    pub fn completed(matches: Vec<String>) -> Self {
        KeywordScan::Completed { matches }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        KeywordScan::Failed { reason: reason.into() }
    }

    /// Matched keywords; empty when the scan failed.
    pub fn matches(&self) -> &[String] {
        match self {
            KeywordScan::Completed { matches } => matches,
            KeywordScan::Failed { .. } => &[],
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.matches().is_empty()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, KeywordScan::Failed { .. })
    }
}

/// Decodes raw bytes as text. A byte order mark selects UTF-16LE/BE or
/// UTF-8; anything undecodable becomes U+FFFD instead of failing.
pub fn decode_text(data: &[u8]) -> Cow<'_, str> {
    let (text, _encoding, _had_errors) = encoding_rs::UTF_8.decode(data);
    text
}

/// Returns every keyword contained in `data`, in the order of `keywords`.
/// Matching is case-insensitive; keywords are expected in lowercase.
pub fn find_keywords(data: &[u8], keywords: &[String]) -> Vec<String> {
    let content = decode_text(data).to_lowercase();

    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty() && content.contains(keyword.as_str()))
        .cloned()
        .collect()
}
