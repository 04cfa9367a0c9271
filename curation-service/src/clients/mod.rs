pub mod crossref;
pub mod download;
pub mod extract;
pub mod openrouter;
pub mod pubmed;

pub use crossref::CrossRefClient;
pub use download::MirrorDownloader;
pub use extract::PdfProcessor;
pub use openrouter::OpenRouterClient;
pub use pubmed::PubMedClient;

use reqwest::Client;
use research_flow::Services;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::ServiceConfig;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Wires the concrete adapters behind the engine's service traits.
pub fn build_services(config: &ServiceConfig) -> anyhow::Result<Services> {
    let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
    let browser = Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(120))
        .build()?;

    let ai = Arc::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    ));
    if ai.is_offline() {
        warn!("OPENROUTER_API_KEY not set, AI steps run in offline mock mode");
    }

    let crossref = CrossRefClient::new(http.clone(), config.crossref_mailto.as_deref());

    Ok(Services {
        keywords: ai.clone(),
        search: Arc::new(PubMedClient::new(http)),
        downloader: Arc::new(MirrorDownloader::new(browser, config.mirrors.clone())),
        processor: Arc::new(PdfProcessor::new(crossref)),
        verifier: ai,
    })
}
