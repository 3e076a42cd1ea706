// uploadscan Core Library
// 核心功能库，包含扫描器、文件名清理、上传存储和配置

pub mod config;
pub mod sanitize;
pub mod scanner;
pub mod storage;

// 重新导出常用类型
pub use config::{load_rules_file, ScannerConfig};
pub use sanitize::{extension_of, secure_filename};
pub use scanner::keyword::KeywordScan;
pub use scanner::risk::{RiskTier, Score, Signals};
pub use scanner::{RiskAssessment, ScanResult, Scanner, UNKNOWN_MIME};
pub use storage::{StoredObject, UploadStore};

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CoreError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Config error: {0}")]
        Config(String),

        #[error("Storage error: {0}")]
        Storage(String),
    }

    pub type Result<T> = std::result::Result<T, CoreError>;
}
