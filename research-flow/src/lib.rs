pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod processor;
pub mod processors;
pub mod review;
pub mod services;
pub mod session;
pub mod stage;
pub mod status;

// Re-export commonly used types
pub use collection::Collection;
pub use config::FlowConfig;
pub use error::{FlowError, Result};
pub use models::{BibliographicMetadata, Claim, Identified, Paper};
pub use processor::{BatchOutcome, BatchProcessor};
pub use processors::{
    BatchKind, DownloadProcessor, ExtractProcessor, KeywordProcessor, SearchProcessor,
    VerifyProcessor,
};
pub use review::{FinalReview, ReviewEntry};
pub use services::{
    ClaimVerifier, DocumentDownloader, DocumentProcessor, ExtractedDocument, KeywordGenerator,
    KeywordLogic, LiteratureSearch, SearchField, SearchQuery, Services,
};
pub use session::{Session, SessionSnapshot, parse_keywords};
pub use stage::{Stage, StageController};
pub use status::{ClaimStatus, PaperStatus};
