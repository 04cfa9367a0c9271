use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{Claim, Paper};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub claim_id: Uuid,
    pub claim: String,
    pub supporting_titles: Vec<String>,
}

/// Verified claims with the titles of the papers backing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReview {
    pub entries: Vec<ReviewEntry>,
}

impl FinalReview {
    /// Pure projection over the current collections. A supporting id with no
    /// matching paper is left out of the listing.
    pub fn assemble(papers: &[Paper], claims: &[Claim]) -> Self {
        let entries = claims
            .iter()
            .filter(|claim| claim.verification_status.is_verified())
            .map(|claim| ReviewEntry {
                claim_id: claim.id,
                claim: claim.text.clone(),
                supporting_titles: claim
                    .supporting_papers
                    .iter()
                    .filter_map(|id| papers.iter().find(|p| p.id == *id))
                    .map(|p| p.title.clone())
                    .collect(),
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FinalReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", entry.claim)?;
            for title in &entry.supporting_titles {
                writeln!(f, "  - {}", title)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ClaimStatus;

    fn claim(text: &str, status: ClaimStatus, supporting: Vec<Uuid>) -> Claim {
        let mut claim = Claim::new(text);
        claim.verification_status = status;
        claim.supporting_papers = supporting;
        claim
    }

    #[test]
    fn lists_only_verified_claims_with_their_titles() {
        let a = Paper::new("Paper A", "10.1/a");
        let b = Paper::new("Paper B", "10.1/b");
        let claims = vec![
            claim("supported", ClaimStatus::Verified, vec![b.id, a.id]),
            claim("rejected", ClaimStatus::Rejected, vec![]),
            claim("pending", ClaimStatus::Pending, vec![a.id]),
        ];

        let review = FinalReview::assemble(&[a, b], &claims);

        assert_eq!(review.entries.len(), 1);
        assert_eq!(review.entries[0].claim, "supported");
        assert_eq!(review.entries[0].supporting_titles, vec!["Paper B", "Paper A"]);
    }

    #[test]
    fn missing_papers_are_silently_omitted() {
        let claims = vec![claim("orphan", ClaimStatus::Verified, vec![Uuid::new_v4()])];

        let review = FinalReview::assemble(&[], &claims);

        assert_eq!(review.entries.len(), 1);
        assert!(review.entries[0].supporting_titles.is_empty());
        assert_eq!(review.to_string(), "orphan\n");
    }

    #[test]
    fn renders_claims_followed_by_titles() {
        let paper = Paper::new("Off-target profiling", "10.1/x");
        let claims = vec![
            claim("first", ClaimStatus::Verified, vec![paper.id]),
            claim("second", ClaimStatus::Verified, vec![]),
        ];

        let text = FinalReview::assemble(&[paper], &claims).to_string();

        assert_eq!(text, "first\n  - Off-target profiling\n\nsecond\n");
    }
}
