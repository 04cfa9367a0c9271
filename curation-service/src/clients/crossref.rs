//! CrossRef DOI resolution.
//!
//! API: https://api.crossref.org/works/{doi}
//! Polite pool: identify with a mailto in the User-Agent.

use reqwest::Client;
use research_flow::BibliographicMetadata;
use serde_json::Value;
use tracing::{debug, instrument};

const CR_API_BASE: &str = "https://api.crossref.org/works";

pub struct CrossRefClient {
    client: Client,
    user_agent: String,
}

impl CrossRefClient {
    pub fn new(client: Client, mailto: Option<&str>) -> Self {
        let user_agent = match mailto {
            Some(mailto) => format!("curation-service/0.1 (mailto:{})", mailto),
            None => "curation-service/0.1".to_string(),
        };
        Self { client, user_agent }
    }

    /// Resolve a DOI to bibliographic metadata. A non-success answer means
    /// CrossRef does not know the DOI and yields `None`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, doi: &str) -> anyhow::Result<Option<BibliographicMetadata>> {
        let url = format!("{}/{}", CR_API_BASE, doi);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "CrossRef miss");
            return Ok(None);
        }

        let body: Value = response.json().await?;
        Ok(parse_work(&body["message"]))
    }
}

fn first_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value[key]
        .as_array()
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

/// Picks title, first author's family name, creation year and the short
/// journal title out of a CrossRef `work` object.
pub fn parse_work(work: &Value) -> Option<BibliographicMetadata> {
    if !work.is_object() {
        return None;
    }

    let title = first_str(work, "title").unwrap_or("Unknown Title").to_string();

    let author = work["author"]
        .as_array()
        .and_then(|a| a.first())
        .and_then(|a| a["family"].as_str())
        .unwrap_or("Unknown")
        .to_string();

    let year = work["created"]["date-parts"]
        .as_array()
        .and_then(|parts| parts.first())
        .and_then(|part| part.as_array())
        .and_then(|part| part.first())
        .and_then(|y| y.as_u64())
        .map(|y| y.to_string())
        .unwrap_or_else(|| "0000".to_string());

    let journal = first_str(work, "short-container-title")
        .or_else(|| first_str(work, "container-title"))
        .unwrap_or("UnknownJournal")
        .to_string();

    Some(BibliographicMetadata {
        title,
        author,
        year,
        journal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_work_is_parsed() {
        let work = json!({
            "title": ["High-fidelity CRISPR-Cas9 nucleases"],
            "author": [
                { "given": "Benjamin", "family": "Kleinstiver" },
                { "given": "J. Keith", "family": "Joung" }
            ],
            "created": { "date-parts": [[2016, 1, 6]] },
            "short-container-title": ["Nature"],
            "container-title": ["Nature Publishing Group"]
        });

        let meta = parse_work(&work).unwrap();

        assert_eq!(meta.title, "High-fidelity CRISPR-Cas9 nucleases");
        assert_eq!(meta.author, "Kleinstiver");
        assert_eq!(meta.year, "2016");
        assert_eq!(meta.journal, "Nature");
    }

    #[test]
    fn missing_fields_fall_back() {
        let work = json!({
            "short-container-title": [],
            "container-title": ["Nucleic Acids Research"]
        });

        let meta = parse_work(&work).unwrap();

        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.author, "Unknown");
        assert_eq!(meta.year, "0000");
        assert_eq!(meta.journal, "Nucleic Acids Research");

        let bare = parse_work(&json!({})).unwrap();
        assert_eq!(bare.journal, "UnknownJournal");
    }

    #[test]
    fn non_object_message_is_a_miss() {
        assert!(parse_work(&Value::Null).is_none());
        assert!(parse_work(&json!("Resource not found.")).is_none());
    }
}
