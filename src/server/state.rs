use std::path::PathBuf;
use std::sync::Arc;

use crate::processing::screening::Screener;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub screener: Arc<Screener>,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(screener: Screener, upload_dir: PathBuf) -> Self {
        Self {
            screener: Arc::new(screener),
            upload_dir: Arc::new(upload_dir),
        }
    }
}
