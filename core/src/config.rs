// Scanner configuration - 扫描器配置
// 启发式名单可以从 YAML 规则文件覆盖

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::scanner::hash::DEFAULT_CHUNK_SIZE;

pub const DEFAULT_SUSPICIOUS_EXTENSIONS: &[&str] = &[".exe", ".dll", ".bat", ".ps1", ".js", ".vbs"];
pub const DEFAULT_KEYWORDS: &[&str] = &["powershell", "cmd.exe", "wget", "curl", "password"];

/// Immutable settings handed to [`crate::Scanner::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Lowercase, dot-prefixed extensions (".exe").
    pub suspicious_extensions: Vec<String>,
    /// Lowercase keywords, matched in this order.
    pub keywords: Vec<String>,
    pub chunk_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            suspicious_extensions: DEFAULT_SUSPICIOUS_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// On-disk shape of a rules file. Omitted lists keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    #[serde(default)]
    pub suspicious_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
}

impl ScannerConfig {
    pub fn is_suspicious_extension(&self, extension: &str) -> bool {
        self.suspicious_extensions.iter().any(|e| e == extension)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let rules: RulesFile =
            serde_yaml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
        Self::from_rules(rules)
    }

    pub fn from_rules(rules: RulesFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(extensions) = rules.suspicious_extensions {
            config.suspicious_extensions = normalize(extensions, |e| {
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{}", e)
                }
            });
        }
        if let Some(keywords) = rules.keywords {
            config.keywords = normalize(keywords, |k| k);
        }
        if let Some(chunk_size) = rules.chunk_size {
            if chunk_size == 0 {
                return Err(CoreError::Config("chunk_size must be greater than zero".into()));
            }
            config.chunk_size = chunk_size;
        }

        Ok(config)
    }
}

/// Trims and lowercases entries, drops blanks and repeats, keeps order.
fn normalize(entries: Vec<String>, shape: impl Fn(String) -> String) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() {
            continue;
        }
        let entry = shape(entry);
        if !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}

/// Loads a scanner configuration from a YAML rules file.
pub fn load_rules_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ScannerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {:?}", path))?;
    let config = ScannerConfig::from_yaml_str(&content)
        .with_context(|| format!("Failed to parse rules file: {:?}", path))?;

    tracing::info!(
        extensions = config.suspicious_extensions.len(),
        keywords = config.keywords.len(),
        "Loaded scanner rules from {:?}",
        path
    );
    Ok(config)
}
