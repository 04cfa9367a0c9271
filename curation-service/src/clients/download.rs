use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, header};
use research_flow::DocumentDownloader;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

static PDF_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(?:iframe|embed)[^>]+id=["']pdf[^>]+src=["']([^"']+)["']"#)
        .expect("valid pdf frame pattern")
});

/// Fetches PDFs by DOI from a list of resolver hosts, tried in order.
///
/// A host either answers with the PDF itself or with an HTML page embedding
/// it; the first host that yields bytes wins.
pub struct MirrorDownloader {
    client: Client,
    mirrors: Vec<String>,
}

impl MirrorDownloader {
    pub fn new(client: Client, mirrors: Vec<String>) -> Self {
        Self { client, mirrors }
    }

    async fn fetch_from(&self, mirror: &str, doi: &str) -> Option<Vec<u8>> {
        let url = format!("{}/{}", mirror, doi);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(mirror, status = %r.status(), "Mirror refused");
                return None;
            }
            Err(e) => {
                debug!(mirror, error = %e, "Mirror unreachable");
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if is_pdf_content_type(&content_type) {
            return response.bytes().await.ok().map(|b| b.to_vec());
        }

        let html = response.text().await.ok()?;
        let link = extract_pdf_link(&html)?;
        debug!(mirror, link = %link, "Following embedded PDF link");

        let pdf = self.client.get(&link).send().await.ok()?;
        if !pdf.status().is_success() {
            return None;
        }
        pdf.bytes().await.ok().map(|b| b.to_vec())
    }
}

#[async_trait]
impl DocumentDownloader for MirrorDownloader {
    #[instrument(skip(self, target_dir))]
    async fn download(&self, doi: &str, target_dir: &Path) -> anyhow::Result<Option<String>> {
        for mirror in &self.mirrors {
            if let Some(bytes) = self.fetch_from(mirror, doi).await {
                let path = save_pdf(&bytes, doi, target_dir).await?;
                info!(mirror = %mirror, path = %path.display(), bytes = bytes.len(), "Saved PDF");
                return Ok(Some(path.to_string_lossy().into_owned()));
            }
        }

        warn!("No mirror produced a PDF");
        Ok(None)
    }
}

fn is_pdf_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.eq_ignore_ascii_case("application/pdf") || mime.eq_ignore_ascii_case("application/octet-stream")
}

/// Finds the `src` of an `<iframe id="pdf">` or `<embed id="pdf">` element.
/// Protocol-relative links are completed with `https:`.
pub fn extract_pdf_link(html: &str) -> Option<String> {
    let src = PDF_FRAME.captures(html)?.get(1)?.as_str();
    if src.starts_with("//") {
        Some(format!("https:{}", src))
    } else {
        Some(src.to_string())
    }
}

pub fn pdf_file_name(doi: &str) -> String {
    format!("paper_{}.pdf", doi.replace(['/', '.'], "_"))
}

async fn save_pdf(bytes: &[u8], doi: &str, target_dir: &Path) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(target_dir).await?;
    let path = target_dir.join(pdf_file_name(doi));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
