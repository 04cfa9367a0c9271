use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 15;

/// Engine-level settings handed to the batch processors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Directory the download service saves PDFs into.
    pub download_dir: PathBuf,
    /// Result ceiling for one literature search.
    pub search_max_results: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
        }
    }
}
