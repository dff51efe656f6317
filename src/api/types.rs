use std::path::PathBuf;
use std::sync::Arc;

use crate::store::ReportStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReportStore>,
}

impl AppState {
    pub fn new(store: ReportStore) -> AppState {
        AppState {
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub static_dir: PathBuf,
}
