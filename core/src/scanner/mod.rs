// Scanner module - 扫描器模块
// 哈希、关键字扫描和风险评分，每次扫描都是无状态的

pub mod hash;
pub mod keyword;
pub mod risk;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::config::ScannerConfig;
use crate::error::Result;
use crate::sanitize::extension_of;
use keyword::{find_keywords, KeywordScan};
use risk::{is_application_mime, RiskTier, Score, Signals};

/// MIME type shown when none could be determined.
pub const UNKNOWN_MIME: &str = "Unknown";

/// Score and tier produced by [`Scanner::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: Score,
    pub risk: RiskTier,
}

/// Everything known about one scanned upload.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub filename: String,
    pub extension: String,
    pub mime_type: String,
    pub sha256: String,
    pub size: u64,
    pub keywords: KeywordScan,
    pub risk: RiskTier,
    pub score: Score,
    pub scanned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_as: Option<String>,
}

impl ScanResult {
    /// Matched keywords, empty when the keyword pass did not run.
    pub fn matched_keywords(&self) -> &[String] {
        self.keywords.matches()
    }
}

pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn hash_file(&self, path: &Path) -> Result<String> {
        Ok(hash::hash_file(path, self.config.chunk_size)?)
    }

    pub fn hash_bytes(&self, data: &[u8]) -> String {
        // chunked over a slice so the configured read size is honored
        hash::hash_reader(data, self.config.chunk_size).unwrap_or_else(|_| hash::hash_bytes(data))
    }

    pub fn scan_keywords(&self, data: &[u8]) -> Vec<String> {
        find_keywords(data, &self.config.keywords)
    }

    /// Reads `path` and runs the keyword pass over it. A read failure is
    /// reported as [`KeywordScan::Failed`] instead of an empty match list.
    pub fn scan_keywords_in_file(&self, path: &Path) -> KeywordScan {
        match fs::read(path) {
            Ok(data) => KeywordScan::completed(self.scan_keywords(&data)),
            Err(e) => {
                tracing::warn!("Keyword scan could not read {:?}: {}", path, e);
                KeywordScan::failed(e.to_string())
            }
        }
    }

    pub fn classify(&self, extension: &str, keywords: &[String], mime_type: Option<&str>) -> RiskAssessment {
        let signals = Signals {
            suspicious_extension: self.config.is_suspicious_extension(&extension.to_lowercase()),
            keyword_match: !keywords.is_empty(),
            application_mime: is_application_mime(mime_type),
        };
        let score = signals.score();
        RiskAssessment { score, risk: score.tier() }
    }

    /// Scans in-memory content.
    pub fn scan_bytes(&self, filename: &str, data: &[u8], mime_type: Option<&str>) -> ScanResult {
        let sha256 = self.hash_bytes(data);
        let keywords = KeywordScan::completed(self.scan_keywords(data));
        self.build_result(filename, sha256, data.len() as u64, keywords, mime_type)
    }

    /// Scans a file already on disk. Hashing failures propagate; keyword
    /// failures are recorded in the result.
    pub fn scan_file(&self, path: &Path, filename: &str, mime_type: Option<&str>) -> Result<ScanResult> {
        let size = fs::metadata(path)?.len();
        let sha256 = self.hash_file(path)?;
        let keywords = self.scan_keywords_in_file(path);
        Ok(self.build_result(filename, sha256, size, keywords, mime_type))
    }

    fn build_result(
        &self,
        filename: &str,
        sha256: String,
        size: u64,
        keywords: KeywordScan,
        mime_type: Option<&str>,
    ) -> ScanResult {
        let extension = extension_of(filename);
        let assessment = self.classify(&extension, keywords.matches(), mime_type);

        tracing::debug!(
            filename,
            score = assessment.score.value(),
            risk = %assessment.risk,
            "Scanned file"
        );

        ScanResult {
            scan_id: Uuid::new_v4(),
            filename: filename.to_string(),
            extension,
            mime_type: mime_type.unwrap_or(UNKNOWN_MIME).to_string(),
            sha256,
            size,
            keywords,
            risk: assessment.risk,
            score: assessment.score,
            scanned_at: Utc::now(),
            stored_as: None,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}
