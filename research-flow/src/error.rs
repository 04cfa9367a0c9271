use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Topic is empty")]
    EmptyTopic,

    #[error("No keywords to search with")]
    EmptyKeywords,

    #[error("Claim text is empty")]
    EmptyClaim,

    #[error("No DOIs given")]
    EmptyDoi,

    #[error("Session is busy: {0}")]
    SessionBusy(String),

    #[error("{service} failed: {message}")]
    ServiceFailed { service: String, message: String },

    #[error("Paper not found: {0}")]
    PaperNotFound(Uuid),

    #[error("Claim not found: {0}")]
    ClaimNotFound(Uuid),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

impl FlowError {
    pub fn service(service: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::ServiceFailed {
            service: service.into(),
            message: source.to_string(),
        }
    }

    /// True for errors raised before any external call or state mutation.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyTopic | Self::EmptyKeywords | Self::EmptyClaim | Self::EmptyDoi
        )
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
