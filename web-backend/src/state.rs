use std::sync::Arc;
use uploadscan_core::{load_rules_file, Scanner, ScannerConfig, UploadStore};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub store: Arc<UploadStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        // 加载扫描规则
        let scanner_config = match &config.rules_file {
            Some(path) => load_rules_file(path)?,
            None => ScannerConfig::default(),
        };

        // 初始化上传目录
        let store = UploadStore::open(&config.upload_dir)?;
        tracing::info!("Upload directory: {}", store.root().display());

        Ok(Self::with_parts(Scanner::new(scanner_config), store, config.max_upload_bytes))
    }

    pub fn with_parts(scanner: Scanner, store: UploadStore, max_upload_bytes: usize) -> Self {
        Self {
            scanner: Arc::new(scanner),
            store: Arc::new(store),
            max_upload_bytes,
        }
    }
}
