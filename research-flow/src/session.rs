use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    collection::Collection,
    error::{FlowError, Result},
    models::{Claim, Paper},
    processor::{BatchOutcome, BatchProcessor},
    review::FinalReview,
    stage::{Stage, StageController},
};

pub const IDLE_STATUS: &str = "Ready";

/// Splits comma-delimited keyword text into trimmed, non-empty entries.
/// Repeated keywords are kept.
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything a reader can observe about a session at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub keywords: String,
    pub papers: Vec<Paper>,
    pub claims: Vec<Claim>,
    pub stage: Stage,
    pub busy: bool,
    pub status_message: String,
    pub last_outcome: Option<BatchOutcome>,
}

/// Single owner of one curation run's state.
///
/// Only the holder of `&mut Session` writes; everyone else reads the
/// snapshots published through [`Session::subscribe`]. Every item mutation is
/// followed by a publish, so readers see progress item by item and never a
/// half-written item.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    topic: String,
    keywords: String,
    papers: Collection<Paper>,
    claims: Collection<Claim>,
    stage: StageController,
    busy: bool,
    status_message: String,
    last_outcome: Option<BatchOutcome>,
    updates: watch::Sender<SessionSnapshot>,
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let initial = SessionSnapshot {
            id,
            created_at,
            topic: String::new(),
            keywords: String::new(),
            papers: Vec::new(),
            claims: Vec::new(),
            stage: Stage::default(),
            busy: false,
            status_message: IDLE_STATUS.to_string(),
            last_outcome: None,
        };
        let (updates, _) = watch::channel(initial);

        Self {
            id,
            created_at,
            topic: String::new(),
            keywords: String::new(),
            papers: Collection::new(),
            claims: Collection::new(),
            stage: StageController::new(),
            busy: false,
            status_message: IDLE_STATUS.to_string(),
            last_outcome: None,
            updates,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn keyword_list(&self) -> Vec<String> {
        parse_keywords(&self.keywords)
    }

    pub fn papers(&self) -> &Collection<Paper> {
        &self.papers
    }

    pub fn claims(&self) -> &Collection<Claim> {
        &self.claims
    }

    pub fn stage(&self) -> Stage {
        self.stage.current()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_outcome(&self) -> Option<&BatchOutcome> {
        self.last_outcome.as_ref()
    }

    // ── Observation ──────────────────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            topic: self.topic.clone(),
            keywords: self.keywords.clone(),
            papers: self.papers.to_vec(),
            claims: self.claims.to_vec(),
            stage: self.stage.current(),
            busy: self.busy,
            status_message: self.status_message.clone(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    // ── User edits ───────────────────────────────────────────────────────────

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
        self.publish();
    }

    /// Replaces the whole keyword text.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = keywords.into();
        self.publish();
    }

    pub fn add_claim(&mut self, text: &str) -> Result<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FlowError::EmptyClaim);
        }
        let id = self.claims.push(Claim::new(text));
        self.publish();
        Ok(id)
    }

    /// Appends one pending paper per non-blank line. The DOI doubles as the
    /// title until extraction finds the real one.
    pub fn add_dois(&mut self, text: &str) -> Result<Vec<Uuid>> {
        let papers: Vec<Paper> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|doi| Paper::new(doi, doi))
            .collect();
        if papers.is_empty() {
            return Err(FlowError::EmptyDoi);
        }

        let ids = papers.iter().map(|p| p.id).collect();
        self.papers.extend(papers);
        self.publish();
        Ok(ids)
    }

    /// Appends a PDF that is already on disk, ready for extraction.
    pub fn add_local_document(&mut self, path: &Path) -> Uuid {
        let id = self.papers.push(Paper::from_local_file(path));
        self.publish();
        id
    }

    // ── Stage navigation ─────────────────────────────────────────────────────

    pub fn go_to(&mut self, stage: Stage) -> Stage {
        let stage = self.stage.go_to(stage);
        self.publish();
        stage
    }

    pub fn advance(&mut self) -> Stage {
        let stage = self.stage.advance();
        self.publish();
        stage
    }

    pub fn back(&mut self) -> Stage {
        let stage = self.stage.back();
        self.publish();
        stage
    }

    // ── Processor-facing mutation ────────────────────────────────────────────

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.publish();
    }

    /// Appends search results behind whatever is already collected.
    pub fn append_papers(&mut self, papers: Vec<Paper>) -> usize {
        let added = self.papers.extend(papers);
        self.publish();
        added
    }

    pub fn update_paper(&mut self, id: Uuid, f: impl FnOnce(&mut Paper)) -> Result<()> {
        if !self.papers.update(id, f) {
            return Err(FlowError::PaperNotFound(id));
        }
        self.publish();
        Ok(())
    }

    pub fn update_claim(&mut self, id: Uuid, f: impl FnOnce(&mut Claim)) -> Result<()> {
        if !self.claims.update(id, f) {
            return Err(FlowError::ClaimNotFound(id));
        }
        self.publish();
        Ok(())
    }

    // ── Batches ──────────────────────────────────────────────────────────────

    /// Runs one batch to completion.
    ///
    /// A session that is already busy rejects the run; there is no queue.
    /// Preconditions are checked before the busy flag is raised, so a
    /// rejected run leaves the session exactly as it was.
    #[instrument(skip(self, processor), fields(session_id = %self.id, processor = processor.id()))]
    pub async fn run(&mut self, processor: &dyn BatchProcessor) -> Result<BatchOutcome> {
        if self.busy {
            return Err(FlowError::SessionBusy(self.status_message.clone()));
        }
        processor.precondition(self)?;

        self.busy = true;
        self.status_message = processor.start_message();
        self.publish();
        info!("Batch started");

        let result = processor.run(self).await;

        self.busy = false;
        match &result {
            Ok(outcome) => {
                info!(
                    eligible = outcome.eligible,
                    succeeded = outcome.succeeded,
                    failed = outcome.failed,
                    "Batch finished: {}",
                    outcome.summary
                );
                self.status_message = outcome.summary.clone();
                self.last_outcome = Some(outcome.clone());
            }
            Err(e) => {
                error!("Batch aborted: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
        self.publish();

        result
    }

    pub fn final_review(&self) -> FinalReview {
        FinalReview::assemble(self.papers.as_slice(), self.claims.as_slice())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
