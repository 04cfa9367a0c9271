use serde::{Deserialize, Serialize};
use std::fmt;

/// The six views a session can be on. Stages never gate processing: any batch
/// can run on any stage and the user may jump anywhere at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    TopicDefinition,
    FetchingPapers,
    DownloadingPDFs,
    ProcessingPDFs,
    ClaimVerification,
    FinalReview,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::TopicDefinition,
        Stage::FetchingPapers,
        Stage::DownloadingPDFs,
        Stage::ProcessingPDFs,
        Stage::ClaimVerification,
        Stage::FinalReview,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::TopicDefinition => "Keywords",
            Stage::FetchingPapers => "Fetch DOIs",
            Stage::DownloadingPDFs => "Download",
            Stage::ProcessingPDFs => "Process Metadata",
            Stage::ClaimVerification => "AI Verification",
            Stage::FinalReview => "Review",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holds the current stage. Transitions are unconditional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageController {
    current: Stage,
}

impl StageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    pub fn go_to(&mut self, stage: Stage) -> Stage {
        self.current = stage;
        self.current
    }

    /// One stage forward, staying on the last one.
    pub fn advance(&mut self) -> Stage {
        let next = Stage::from_index(self.current.index() + 1).unwrap_or(self.current);
        self.go_to(next)
    }

    /// One stage back, staying on the first one.
    pub fn back(&mut self) -> Stage {
        let previous = self
            .current
            .index()
            .checked_sub(1)
            .and_then(Stage::from_index)
            .unwrap_or(self.current);
        self.go_to(previous)
    }
}
