use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::Result,
    processor::{BatchOutcome, BatchProcessor},
    services::ClaimVerifier,
    session::Session,
    status::ClaimStatus,
};

/// Checks each claim against the extracted text of every ready paper.
///
/// One service call per (claim, paper) pair, strictly in order. A failing
/// pair counts as "not supporting" and the sweep carries on. Claims that are
/// already verified are not revisited.
pub struct VerifyProcessor {
    verifier: Arc<dyn ClaimVerifier>,
}

impl VerifyProcessor {
    pub fn new(verifier: Arc<dyn ClaimVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl BatchProcessor for VerifyProcessor {
    fn id(&self) -> &str {
        "verify"
    }

    fn start_message(&self) -> String {
        "Verifying claims...".to_string()
    }

    async fn run(&self, session: &mut Session) -> Result<BatchOutcome> {
        let eligible = session
            .claims()
            .ids_where(|c| !c.verification_status.is_verified());
        let mut outcome = BatchOutcome::new(self.id(), eligible.len());

        for (n, claim_id) in eligible.iter().copied().enumerate() {
            let Some(text) = session.claims().get(claim_id).map(|c| c.text.clone()) else {
                continue;
            };
            session.set_status(format!("Verifying claim {}/{}...", n + 1, eligible.len()));
            session.update_claim(claim_id, |claim| {
                claim.verification_status = ClaimStatus::Checking;
            })?;

            let contexts: Vec<(Uuid, String)> = session
                .papers()
                .iter()
                .filter_map(|p| p.verification_context().map(|ctx| (p.id, ctx.to_string())))
                .collect();

            let mut supporting = Vec::new();
            for (paper_id, context) in &contexts {
                match self.verifier.verify(&text, context).await {
                    Ok(true) => supporting.push(*paper_id),
                    Ok(false) => {}
                    Err(e) => {
                        let message = format!("{:#}", e);
                        warn!(claim_id = %claim_id, paper_id = %paper_id, error = %message, "Verification call failed, treating as unsupported");
                        outcome.record_error(message);
                    }
                }
            }

            let status = if supporting.is_empty() {
                outcome.record_failure(None);
                ClaimStatus::Rejected
            } else {
                outcome.record_success();
                ClaimStatus::Verified
            };
            info!(claim_id = %claim_id, status = %status, supporting = supporting.len(), "Claim checked");

            session.update_claim(claim_id, |claim| {
                claim.verification_status = status;
                claim.supporting_papers = supporting;
            })?;
        }

        let summary = format!(
            "Verification Complete. {} verified, {} rejected.",
            outcome.succeeded, outcome.failed
        );
        Ok(outcome.finish(summary))
    }
}
