use research_flow::{BatchKind, FinalReview, Stage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsRequest {
    /// Comma-separated keyword text, stored verbatim.
    pub keywords: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStep {
    Next,
    Back,
}

/// Either jump to a stage or step one stage forward/back.
#[derive(Debug, Serialize, Deserialize)]
pub struct StageRequest {
    pub stage: Option<Stage>,
    pub step: Option<StageStep>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoisRequest {
    /// One DOI per line.
    pub dois: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalDocumentRequest {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddedResponse {
    pub session_id: Uuid,
    pub added: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchStartedResponse {
    pub session_id: Uuid,
    pub batch: BatchKind,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub session_id: Uuid,
    pub review: FinalReview,
    /// Plain-text rendering of the review.
    pub text: String,
}
