use anyhow::anyhow;
use async_trait::async_trait;
use lopdf::Document;
use regex::Regex;
use research_flow::{BibliographicMetadata, DocumentProcessor, ExtractedDocument};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use super::crossref::CrossRefClient;

pub const INTRODUCTION_CHARS: usize = 2000;

static DOI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(10\.\d{4,9}/[-._;()/:a-zA-Z0-9]+)").expect("valid DOI pattern")
});

static INTRODUCTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)introduction").expect("valid heading pattern"));

/// Reads a downloaded PDF, identifies it through the first DOI in its text,
/// renames it after CrossRef metadata and cuts out the introduction.
pub struct PdfProcessor {
    crossref: CrossRefClient,
}

impl PdfProcessor {
    pub fn new(crossref: CrossRefClient) -> Self {
        Self { crossref }
    }
}

#[async_trait]
impl DocumentProcessor for PdfProcessor {
    #[instrument(skip(self))]
    async fn process(&self, local_path: &str) -> anyhow::Result<Option<ExtractedDocument>> {
        let path = PathBuf::from(local_path);

        let Some(text) = read_pdf_text(path.clone()).await? else {
            return Ok(None);
        };

        let Some(doi) = extract_doi(&text) else {
            debug!("No DOI in document text");
            return Ok(None);
        };

        let Some(metadata) = self.crossref.resolve(&doi).await? else {
            return Ok(None);
        };

        let renamed = rename_after(&path, &metadata).await?;
        info!(doi = %doi, renamed = %renamed.display(), "Processed PDF");

        Ok(Some(ExtractedDocument {
            local_path: renamed.to_string_lossy().into_owned(),
            metadata,
            introduction: extract_introduction(&text),
        }))
    }
}

/// Text of every page, or `None` when the file is not a readable PDF.
async fn read_pdf_text(path: PathBuf) -> anyhow::Result<Option<String>> {
    tokio::task::spawn_blocking(move || {
        let document = match Document::load(&path) {
            Ok(doc) => doc,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable PDF");
                return None;
            }
        };
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        document.extract_text(&pages).ok()
    })
    .await
    .map_err(|e| anyhow!("PDF reader task failed: {}", e))
}

pub fn extract_doi(text: &str) -> Option<String> {
    DOI_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Up to [`INTRODUCTION_CHARS`] characters following the first
/// "introduction", or the start of the text when there is no such heading.
pub fn extract_introduction(text: &str) -> Option<String> {
    let rest = match INTRODUCTION_HEADING.find(text) {
        Some(heading) => &text[heading.end()..],
        None => text,
    };
    let intro: String = rest.chars().take(INTRODUCTION_CHARS).collect();
    if intro.trim().is_empty() {
        None
    } else {
        Some(intro)
    }
}

/// `<year>_<author>_<journal>.pdf` with journal spaces removed and
/// filesystem-hostile characters stripped.
pub fn renamed_file_name(metadata: &BibliographicMetadata) -> String {
    let journal = metadata.journal.replace(' ', "");
    let author = metadata.author.replace('/', "");
    sanitize_file_name(&format!("{}_{}_{}.pdf", metadata.year, author, journal))
}

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !r#"<>:"/\|?*"#.contains(*c))
        .collect()
}

/// Moves the file next to itself under its metadata name, replacing any
/// file already there.
async fn rename_after(path: &Path, metadata: &BibliographicMetadata) -> anyhow::Result<PathBuf> {
    let target = path.with_file_name(renamed_file_name(metadata));
    if target == path {
        return Ok(target);
    }
    if tokio::fs::try_exists(&target).await? {
        tokio::fs::remove_file(&target).await?;
    }
    tokio::fs::rename(path, &target).await?;
    Ok(target)
}
