use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use research_flow::{KeywordLogic, LiteratureSearch, Paper, SearchField, SearchQuery};
use serde_json::Value;
use tracing::{info, instrument};

pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// NCBI E-utilities search: `esearch` for PMIDs, then `esummary` for titles and DOIs.
pub struct PubMedClient {
    client: Client,
    base_url: String,
}

impl PubMedClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: EUTILS_BASE_URL.to_string(),
        }
    }

    async fn search_ids(&self, term: &str, max_results: usize) -> anyhow::Result<Vec<String>> {
        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(term),
            max_results
        );

        let data: Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("PubMed search request failed: {}", e))?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse search response: {}", e))?;

        let ids = data["esearchresult"]["idlist"]
            .as_array()
            .ok_or_else(|| anyhow!("No id list in search response"))?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Ok(ids)
    }

    async fn summaries(&self, pmids: &[String]) -> anyhow::Result<Vec<Paper>> {
        let url = format!(
            "{}/esummary.fcgi?db=pubmed&id={}&retmode=json",
            self.base_url,
            pmids.join(",")
        );

        let data: Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("PubMed summary request failed: {}", e))?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse summary response: {}", e))?;

        parse_summary(&data, pmids)
    }
}

#[async_trait]
impl LiteratureSearch for PubMedClient {
    #[instrument(skip(self, query), fields(keywords = query.keywords.len()))]
    async fn search(&self, query: &SearchQuery) -> anyhow::Result<Vec<Paper>> {
        let Some(term) = build_query(query) else {
            return Ok(Vec::new());
        };
        info!("PubMed term: {}", term);

        let pmids = self.search_ids(&term, query.max_results).await?;
        if pmids.is_empty() {
            info!("No PubMed hits");
            return Ok(Vec::new());
        }

        let papers = self.summaries(&pmids).await?;
        info!("{} of {} hits carry a DOI", papers.len(), pmids.len());
        Ok(papers)
    }
}

pub fn field_tag(field: SearchField) -> &'static str {
    match field {
        SearchField::TitleAndAbstract => "[Title/Abstract]",
        SearchField::Title => "[Title]",
        SearchField::Abstract => "[Abstract]",
    }
}

/// Builds the esearch term. Multi-word keywords are quoted as phrases.
/// Returns `None` when there is nothing to search for.
pub fn build_query(query: &SearchQuery) -> Option<String> {
    let tag = field_tag(query.field);
    let terms: Vec<String> = query
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            if k.contains(' ') {
                format!("\"{}\"{}", k, tag)
            } else {
                format!("{}{}", k, tag)
            }
        })
        .collect();

    if terms.is_empty() {
        return None;
    }

    let joiner = match query.logic {
        KeywordLogic::All => " AND ",
        KeywordLogic::Any => " OR ",
    };
    Some(terms.join(joiner))
}

/// Turns an esummary response into pending papers, in PMID order.
/// Records without a DOI are dropped.
pub fn parse_summary(data: &Value, pmids: &[String]) -> anyhow::Result<Vec<Paper>> {
    let result = data["result"]
        .as_object()
        .ok_or_else(|| anyhow!("No result object in summary response"))?;

    let papers = pmids
        .iter()
        .filter_map(|pmid| {
            let record = result.get(pmid)?;
            let doi = record["articleids"]
                .as_array()?
                .iter()
                .find(|id| id["idtype"].as_str() == Some("doi"))
                .and_then(|id| id["value"].as_str())
                .filter(|doi| !doi.is_empty())?;
            let title = record["title"].as_str().unwrap_or("Unknown Title");
            Some(Paper::new(title, doi).with_pmid(pmid.as_str()))
        })
        .collect();

    Ok(papers)
}
