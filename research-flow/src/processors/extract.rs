use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    processor::{BatchOutcome, BatchProcessor},
    services::DocumentProcessor,
    session::Session,
    status::PaperStatus,
};

/// Renames downloaded PDFs after their metadata and pulls out the
/// introduction text used later as verification context.
pub struct ExtractProcessor {
    processor: Arc<dyn DocumentProcessor>,
}

impl ExtractProcessor {
    pub fn new(processor: Arc<dyn DocumentProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl BatchProcessor for ExtractProcessor {
    fn id(&self) -> &str {
        "process"
    }

    fn start_message(&self) -> String {
        "Processing PDFs...".to_string()
    }

    async fn run(&self, session: &mut Session) -> Result<BatchOutcome> {
        let eligible = session
            .papers()
            .ids_where(|p| p.status == PaperStatus::Downloaded && p.has_local_file());
        let mut outcome = BatchOutcome::new(self.id(), eligible.len());

        for (n, id) in eligible.iter().copied().enumerate() {
            let Some(path) = session.papers().get(id).and_then(|p| p.local_path.clone()) else {
                continue;
            };
            session.set_status(format!("Renaming {}/{}...", n + 1, eligible.len()));

            match self.processor.process(&path).await {
                Ok(Some(document)) => {
                    info!(path = %path, renamed = %document.local_path, "Extracted");
                    outcome.record_success();
                    session.update_paper(id, |paper| {
                        if !document.local_path.is_empty() {
                            paper.local_path = Some(document.local_path);
                        }
                        paper.introduction = document.introduction;
                        paper.metadata = Some(document.metadata);
                        paper.status = PaperStatus::Ready;
                    })?;
                }
                Ok(None) => {
                    debug!(path = %path, "Nothing to extract");
                    outcome.record_unchanged();
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    warn!(path = %path, error = %message, "Extraction failed");
                    outcome.record_failure(Some(message.clone()));
                    session.update_paper(id, |paper| paper.status = PaperStatus::Failed(message))?;
                }
            }
        }

        Ok(outcome.finish("PDF Processing Complete."))
    }
}
