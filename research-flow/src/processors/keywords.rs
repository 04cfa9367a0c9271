use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{FlowError, Result},
    processor::{BatchOutcome, BatchProcessor},
    services::KeywordGenerator,
    session::Session,
};

/// Asks the keyword service for search terms and overwrites the session's
/// keyword text with the answer.
pub struct KeywordProcessor {
    generator: Arc<dyn KeywordGenerator>,
}

impl KeywordProcessor {
    pub fn new(generator: Arc<dyn KeywordGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl BatchProcessor for KeywordProcessor {
    fn id(&self) -> &str {
        "keywords"
    }

    fn start_message(&self) -> String {
        "Generating keywords via AI...".to_string()
    }

    fn precondition(&self, session: &Session) -> Result<()> {
        if session.topic().trim().is_empty() {
            return Err(FlowError::EmptyTopic);
        }
        Ok(())
    }

    async fn run(&self, session: &mut Session) -> Result<BatchOutcome> {
        let topic = session.topic().to_string();

        let keywords = self
            .generator
            .generate_keywords(&topic)
            .await
            .map_err(|e| FlowError::service("Keyword generation", format!("{:#}", e)))?;

        info!("Generated {} keywords", keywords.len());
        session.set_keywords(keywords.join(", "));

        let mut outcome = BatchOutcome::new(self.id(), 1);
        outcome.succeeded = keywords.len();
        Ok(outcome.finish("Keywords generated."))
    }
}
