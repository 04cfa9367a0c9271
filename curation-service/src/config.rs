use research_flow::FlowConfig;
use research_flow::config::{DEFAULT_DOWNLOAD_DIR, DEFAULT_SEARCH_MAX_RESULTS};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MIRRORS: &[&str] = &["https://doi.org"];

/// Process-wide settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// `None` puts the AI adapters into offline mock mode.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub download_dir: PathBuf,
    pub search_max_results: usize,
    pub port: u16,
    pub crossref_mailto: Option<String>,
    pub mirrors: Vec<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mirrors = non_empty("PDF_MIRRORS")
            .map(|list| {
                list.split(',')
                    .map(|m| m.trim().trim_end_matches('/').to_string())
                    .filter(|m| !m.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect());

        Self {
            openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            openrouter_model: non_empty("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            download_dir: non_empty("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            search_max_results: non_empty("SEARCH_MAX_RESULTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_MAX_RESULTS),
            port: non_empty("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            crossref_mailto: non_empty("CROSSREF_MAILTO"),
            mirrors,
        }
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            download_dir: self.download_dir.clone(),
            search_max_results: self.search_max_results,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ServiceConfig::default();
        assert!(config.openrouter_api_key.is_none());
        assert_eq!(config.openrouter_model, DEFAULT_MODEL);
        assert_eq!(config.download_dir, PathBuf::from("./downloads"));
        assert_eq!(config.search_max_results, 15);
        assert_eq!(config.port, 3000);
        assert_eq!(config.mirrors, vec!["https://doi.org"]);
    }

    #[test]
    fn blank_and_unparsable_values_fall_back() {
        let config = config(&[
            ("OPENROUTER_API_KEY", "  "),
            ("SEARCH_MAX_RESULTS", "many"),
            ("PORT", "-1"),
            ("PDF_MIRRORS", " , "),
        ]);
        assert!(config.openrouter_api_key.is_none());
        assert_eq!(config.search_max_results, 15);
        assert_eq!(config.port, 3000);
        assert_eq!(config.mirrors, vec!["https://doi.org"]);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = config(&[
            ("OPENROUTER_API_KEY", "sk-test"),
            ("DOWNLOAD_DIR", "/data/pdfs"),
            ("SEARCH_MAX_RESULTS", "40"),
            ("PDF_MIRRORS", "https://a.example/, https://b.example"),
        ]);
        assert_eq!(config.openrouter_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.mirrors, vec!["https://a.example", "https://b.example"]);
        let flow = config.flow_config();
        assert_eq!(flow.download_dir, PathBuf::from("/data/pdfs"));
        assert_eq!(flow.search_max_results, 40);
    }
}
