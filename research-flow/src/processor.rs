use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Result, session::Session};

/// Aggregate result of one batch run.
///
/// For item sweeps the counters are per item. For the single-call batches
/// (keyword generation, search) `eligible` is 1 and `succeeded` is the number
/// of values the service produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub processor: String,
    pub eligible: usize,
    pub succeeded: usize,
    /// Items that ended in a failure state. For verification: claims rejected.
    pub failed: usize,
    /// Items the service had nothing to say about; their state is untouched.
    pub unchanged: usize,
    /// Text of the last item-level error seen, swallowed ones included.
    pub last_error: Option<String>,
    pub summary: String,
    pub finished_at: DateTime<Utc>,
}

impl BatchOutcome {
    pub fn new(processor: impl Into<String>, eligible: usize) -> Self {
        Self {
            processor: processor.into(),
            eligible,
            succeeded: 0,
            failed: 0,
            unchanged: 0,
            last_error: None,
            summary: String::new(),
            finished_at: Utc::now(),
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, error: Option<String>) {
        self.failed += 1;
        if error.is_some() {
            self.last_error = error;
        }
    }

    pub fn record_unchanged(&mut self) {
        self.unchanged += 1;
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    pub fn finish(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self.finished_at = Utc::now();
        self
    }
}

/// One pipeline activity that sweeps the session's collections.
///
/// Implementations mutate items only through the session's `update_*`
/// methods so every change is published before the next external call.
#[async_trait]
pub trait BatchProcessor: Send + Sync {
    /// Unique identifier for this processor
    fn id(&self) -> &str;

    /// Status message shown while the batch runs.
    fn start_message(&self) -> String;

    /// Checked by [`Session::run`] before anything is mutated or called.
    fn precondition(&self, _session: &Session) -> Result<()> {
        Ok(())
    }

    /// Sweep the session. Item-level failures are recorded on the items;
    /// only a batch-level failure comes back as `Err`.
    async fn run(&self, session: &mut Session) -> Result<BatchOutcome>;
}
