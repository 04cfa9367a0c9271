use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::Result,
    processor::{BatchOutcome, BatchProcessor},
    services::DocumentDownloader,
    session::Session,
    status::PaperStatus,
};

pub const DOWNLOAD_FAILED: &str = "Download failed";

/// Downloads every pending paper, one at a time, in collection order.
///
/// Papers in any other status are left alone, so running this again after a
/// partial run only picks up what was never attempted.
pub struct DownloadProcessor {
    downloader: Arc<dyn DocumentDownloader>,
    download_dir: PathBuf,
}

impl DownloadProcessor {
    pub fn new(downloader: Arc<dyn DocumentDownloader>, download_dir: PathBuf) -> Self {
        Self {
            downloader,
            download_dir,
        }
    }
}

#[async_trait]
impl BatchProcessor for DownloadProcessor {
    fn id(&self) -> &str {
        "download"
    }

    fn start_message(&self) -> String {
        "Downloading PDFs...".to_string()
    }

    async fn run(&self, session: &mut Session) -> Result<BatchOutcome> {
        let eligible = session
            .papers()
            .ids_where(|p| p.status == PaperStatus::Pending);
        let mut outcome = BatchOutcome::new(self.id(), eligible.len());

        for (n, id) in eligible.iter().copied().enumerate() {
            let Some(doi) = session.papers().get(id).map(|p| p.doi.clone()) else {
                continue;
            };
            session.set_status(format!("Downloading {}/{}...", n + 1, eligible.len()));

            let (status, local_path) = match self.downloader.download(&doi, &self.download_dir).await {
                Ok(Some(path)) if !path.is_empty() => {
                    info!(doi = %doi, path = %path, "Downloaded");
                    outcome.record_success();
                    (PaperStatus::Downloaded, Some(path))
                }
                Ok(_) => {
                    warn!(doi = %doi, "No copy found");
                    outcome.record_failure(None);
                    (PaperStatus::failed(DOWNLOAD_FAILED), None)
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    warn!(doi = %doi, error = %message, "Download errored");
                    outcome.record_failure(Some(message.clone()));
                    (PaperStatus::Failed(message), None)
                }
            };

            session.update_paper(id, |paper| {
                paper.status = status;
                if local_path.is_some() {
                    paper.local_path = local_path;
                }
            })?;
        }

        let summary = format!(
            "PDF Downloads Complete. Downloaded {} of {}.",
            outcome.succeeded, outcome.eligible
        );
        Ok(outcome.finish(summary))
    }
}
