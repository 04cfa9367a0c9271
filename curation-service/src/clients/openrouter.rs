use async_trait::async_trait;
use research_flow::{ClaimVerifier, KeywordGenerator};
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::openrouter,
};
use tracing::{debug, info, instrument};

/// Keywords handed out when no API key is configured.
pub const OFFLINE_KEYWORDS: [&str; 3] = ["CRISPR", "Gene Editing", "Off-target"];

/// Keyword generation and claim verification through an OpenRouter chat model.
///
/// Without an API key both operations answer from a fixed script, so the
/// whole pipeline can be exercised offline.
pub struct OpenRouterClient {
    api_key: Option<String>,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.api_key.is_none()
    }

    fn agent(&self, api_key: &str, preamble: &str) -> Agent<openrouter::CompletionModel> {
        let client = openrouter::Client::new(api_key);
        client.agent(&self.model).preamble(preamble).build()
    }
}

#[async_trait]
impl KeywordGenerator for OpenRouterClient {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate_keywords(&self, topic: &str) -> anyhow::Result<Vec<String>> {
        let Some(api_key) = &self.api_key else {
            info!("No OpenRouter API key, using offline keywords");
            return Ok(OFFLINE_KEYWORDS.iter().map(|k| k.to_string()).collect());
        };

        let prompt = format!(
            "Generate a list of 3-5 precise, highly relevant single keywords or short phrases to search PubMed for the following topic: '{}'.\n\
             Return ONLY a comma-separated list of keywords. Do not include any other text or explanations.",
            topic
        );
        let agent = self.agent(api_key, "You are a biomedical literature search assistant.");
        let response = agent.prompt(prompt.as_str()).await?;
        debug!("LLM response for keywords: {}", response);

        Ok(parse_keyword_answer(&response))
    }
}

#[async_trait]
impl ClaimVerifier for OpenRouterClient {
    #[instrument(skip(self, context), fields(model = %self.model))]
    async fn verify(&self, claim: &str, context: &str) -> anyhow::Result<bool> {
        let Some(api_key) = &self.api_key else {
            info!("No OpenRouter API key, accepting claim offline");
            return Ok(true);
        };

        let prompt = format!(
            "Does the following text support the claim: '{}'?\nText: {}\n\nAnswer ONLY with 'YES' or 'NO'.",
            claim, context
        );
        let agent = self.agent(api_key, "You are a careful scientific fact checker.");
        let response = agent.prompt(prompt.as_str()).await?;
        debug!("LLM verdict: {}", response);

        Ok(is_supporting(&response))
    }
}

/// Splits a comma-separated model answer into trimmed, non-empty keywords.
pub fn parse_keyword_answer(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(|k| k.trim().trim_matches('"').trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_supporting(answer: &str) -> bool {
    answer.to_uppercase().contains("YES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_answer_is_split_and_trimmed() {
        assert_eq!(
            parse_keyword_answer(" CRISPR,  \"base editing\" ,, off-target effects\n"),
            vec!["CRISPR", "base editing", "off-target effects"]
        );
        assert!(parse_keyword_answer(" , ").is_empty());
    }

    #[test]
    fn verdict_looks_for_yes_in_any_case() {
        assert!(is_supporting("Yes."));
        assert!(is_supporting("ANSWER: YES"));
        assert!(!is_supporting("No"));
        assert!(!is_supporting(""));
    }

    #[tokio::test]
    async fn offline_mode_uses_fixed_answers() {
        let client = OpenRouterClient::new(None, "any/model");
        assert!(client.is_offline());
        assert_eq!(
            client.generate_keywords("gene therapy").await.unwrap(),
            vec!["CRISPR", "Gene Editing", "Off-target"]
        );
        assert!(client.verify("claim", "context").await.unwrap());
    }
}
