use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::status::{ClaimStatus, PaperStatus};

/// Anything stored in a [`Collection`](crate::Collection) is addressed by a stable id.
pub trait Identified {
    fn id(&self) -> Uuid;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    pub title: String,
    pub doi: String,
    pub pmid: Option<String>,
    pub status: PaperStatus,
    pub local_path: Option<String>,
    pub abstract_text: Option<String>,
    pub introduction: Option<String>,
    pub metadata: Option<BibliographicMetadata>,
}

impl Paper {
    pub fn new(title: impl Into<String>, doi: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            doi: doi.into(),
            pmid: None,
            status: PaperStatus::Pending,
            local_path: None,
            abstract_text: None,
            introduction: None,
            metadata: None,
        }
    }

    pub fn with_pmid(mut self, pmid: impl Into<String>) -> Self {
        self.pmid = Some(pmid.into());
        self
    }

    /// A paper whose PDF is already on disk; it skips the download step.
    pub fn from_local_file(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let mut paper = Self::new(title, "");
        paper.status = PaperStatus::Downloaded;
        paper.local_path = Some(path.to_string_lossy().into_owned());
        paper
    }

    pub fn has_local_file(&self) -> bool {
        self.local_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Ready papers with extracted text are the only usable verification context.
    pub fn verification_context(&self) -> Option<&str> {
        match (&self.status, self.introduction.as_deref()) {
            (PaperStatus::Ready, Some(intro)) if !intro.is_empty() => Some(intro),
            _ => None,
        }
    }
}

impl Identified for Paper {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicMetadata {
    pub title: String,
    pub author: String,
    pub year: String,
    pub journal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    pub text: String,
    pub verification_status: ClaimStatus,
    pub supporting_papers: Vec<Uuid>,
}

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            verification_status: ClaimStatus::Pending,
            supporting_papers: Vec::new(),
        }
    }
}

impl Identified for Claim {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_paper_starts_downloaded() {
        let paper = Paper::from_local_file(Path::new("/tmp/papers/crispr_review.pdf"));
        assert_eq!(paper.title, "crispr_review");
        assert_eq!(paper.status, PaperStatus::Downloaded);
        assert!(paper.has_local_file());
        assert!(paper.doi.is_empty());
    }

    #[test]
    fn only_ready_papers_with_text_give_context() {
        let mut paper = Paper::new("A", "10.1/a");
        paper.introduction = Some("CRISPR reduces off-target effects".into());
        assert!(paper.verification_context().is_none());

        paper.status = PaperStatus::Ready;
        assert_eq!(
            paper.verification_context(),
            Some("CRISPR reduces off-target effects")
        );

        paper.introduction = Some(String::new());
        assert!(paper.verification_context().is_none());
    }
}
