//! Scripted stand-ins for the external services.

use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::models::{BibliographicMetadata, Paper};
use crate::services::{
    ClaimVerifier, DocumentDownloader, DocumentProcessor, ExtractedDocument, KeywordGenerator,
    LiteratureSearch, SearchQuery, Services,
};

/// What a scripted service answers for one request.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Found(T),
    Empty,
    Error(String),
}

impl<T: Clone> Reply<T> {
    fn answer(&self) -> anyhow::Result<Option<T>> {
        match self {
            Reply::Found(value) => Ok(Some(value.clone())),
            Reply::Empty => Ok(None),
            Reply::Error(message) => Err(anyhow!(message.clone())),
        }
    }
}

pub struct ScriptedKeywords {
    pub reply: Result<Vec<String>, String>,
    pub topics: Mutex<Vec<String>>,
}

impl ScriptedKeywords {
    pub fn returning(keywords: &[&str]) -> Self {
        Self {
            reply: Ok(keywords.iter().map(|k| k.to_string()).collect()),
            topics: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            topics: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.topics.lock().unwrap().len()
    }
}

#[async_trait]
impl KeywordGenerator for ScriptedKeywords {
    async fn generate_keywords(&self, topic: &str) -> anyhow::Result<Vec<String>> {
        self.topics.lock().unwrap().push(topic.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

pub struct ScriptedSearch {
    pub reply: Result<Vec<Paper>, String>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl ScriptedSearch {
    pub fn returning(papers: Vec<Paper>) -> Self {
        Self {
            reply: Ok(papers),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl LiteratureSearch for ScriptedSearch {
    async fn search(&self, query: &SearchQuery) -> anyhow::Result<Vec<Paper>> {
        self.queries.lock().unwrap().push(query.clone());
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

/// Answers per DOI; unknown DOIs come back empty.
#[derive(Default)]
pub struct ScriptedDownloader {
    pub replies: HashMap<String, Reply<String>>,
    pub requested: Mutex<Vec<String>>,
}

impl ScriptedDownloader {
    pub fn with(mut self, doi: &str, reply: Reply<String>) -> Self {
        self.replies.insert(doi.to_string(), reply);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentDownloader for ScriptedDownloader {
    async fn download(&self, doi: &str, _target_dir: &Path) -> anyhow::Result<Option<String>> {
        self.requested.lock().unwrap().push(doi.to_string());
        self.replies
            .get(doi)
            .map_or(Ok(None), |reply| reply.answer())
    }
}

/// Answers per local path; unknown paths come back empty.
#[derive(Default)]
pub struct ScriptedProcessor {
    pub replies: HashMap<String, Reply<ExtractedDocument>>,
    pub requested: Mutex<Vec<String>>,
}

impl ScriptedProcessor {
    pub fn with(mut self, path: &str, reply: Reply<ExtractedDocument>) -> Self {
        self.replies.insert(path.to_string(), reply);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentProcessor for ScriptedProcessor {
    async fn process(&self, local_path: &str) -> anyhow::Result<Option<ExtractedDocument>> {
        self.requested.lock().unwrap().push(local_path.to_string());
        self.replies
            .get(local_path)
            .map_or(Ok(None), |reply| reply.answer())
    }
}

type Judge = Box<dyn Fn(&str, &str) -> Result<bool, String> + Send + Sync>;

pub struct ScriptedVerifier {
    judge: Judge,
    pub pairs: Mutex<Vec<(String, String)>>,
}

impl ScriptedVerifier {
    pub fn new(judge: impl Fn(&str, &str) -> Result<bool, String> + Send + Sync + 'static) -> Self {
        Self {
            judge: Box::new(judge),
            pairs: Mutex::new(Vec::new()),
        }
    }

    /// Supported whenever the context contains the claim text.
    pub fn substring() -> Self {
        Self::new(|claim, context| Ok(context.contains(claim)))
    }

    pub fn calls(&self) -> usize {
        self.pairs.lock().unwrap().len()
    }
}

#[async_trait]
impl ClaimVerifier for ScriptedVerifier {
    async fn verify(&self, claim: &str, context: &str) -> anyhow::Result<bool> {
        self.pairs
            .lock()
            .unwrap()
            .push((claim.to_string(), context.to_string()));
        (self.judge)(claim, context).map_err(|e| anyhow!(e))
    }
}

pub fn extracted(path: &str, title: &str, intro: &str) -> ExtractedDocument {
    ExtractedDocument {
        local_path: path.to_string(),
        metadata: BibliographicMetadata {
            title: title.to_string(),
            author: "Doudna".to_string(),
            year: "2020".to_string(),
            journal: "Nature".to_string(),
        },
        introduction: Some(intro.to_string()),
    }
}

pub fn services(
    keywords: Arc<ScriptedKeywords>,
    search: Arc<ScriptedSearch>,
    downloader: Arc<ScriptedDownloader>,
    processor: Arc<ScriptedProcessor>,
    verifier: Arc<ScriptedVerifier>,
) -> Services {
    Services {
        keywords,
        search,
        downloader,
        processor,
        verifier,
    }
}
