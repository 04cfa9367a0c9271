pub mod download;
pub mod extract;
pub mod keywords;
pub mod search;
pub mod verify;

#[cfg(test)]
pub(crate) mod mocks;

pub use download::DownloadProcessor;
pub use extract::ExtractProcessor;
pub use keywords::KeywordProcessor;
pub use search::SearchProcessor;
pub use verify::VerifyProcessor;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{config::FlowConfig, processor::BatchProcessor, services::Services};

/// The five batch activities a driver can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    Keywords,
    Search,
    Download,
    Process,
    Verify,
}

impl BatchKind {
    pub const ALL: [BatchKind; 5] = [
        BatchKind::Keywords,
        BatchKind::Search,
        BatchKind::Download,
        BatchKind::Process,
        BatchKind::Verify,
    ];

    pub fn processor(self, services: &Services, config: &FlowConfig) -> Box<dyn BatchProcessor> {
        match self {
            BatchKind::Keywords => Box::new(KeywordProcessor::new(services.keywords.clone())),
            BatchKind::Search => Box::new(SearchProcessor::new(
                services.search.clone(),
                config.search_max_results,
            )),
            BatchKind::Download => Box::new(DownloadProcessor::new(
                services.downloader.clone(),
                config.download_dir.clone(),
            )),
            BatchKind::Process => Box::new(ExtractProcessor::new(services.processor.clone())),
            BatchKind::Verify => Box::new(VerifyProcessor::new(services.verifier.clone())),
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchKind::Keywords => "keywords",
            BatchKind::Search => "search",
            BatchKind::Download => "download",
            BatchKind::Process => "process",
            BatchKind::Verify => "verify",
        };
        f.write_str(name)
    }
}
