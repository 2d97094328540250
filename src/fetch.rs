//! Fetches a remote post so its outline can be built.
//!
//! Markdown sources are preferred: the plain URL is tried together with the
//! `.md` and `/index.md` variations, concurrently. HTML is converted to
//! Markdown only when no Markdown variation answered.

use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub url: String,
    pub markdown: String,
    pub converted_from_html: bool,
}

#[derive(Debug)]
struct FetchResult {
    url: String,
    content: String,
    is_html: bool,
    is_markdown: bool,
}

impl FetchResult {
    fn is_markdown_source(&self) -> bool {
        #[allow(clippy::case_sensitive_file_extension_comparisons)]
        let md_path = self.url.to_lowercase().ends_with(".md");
        self.is_markdown || md_path
    }
}

pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?)
}

fn get_url_variations(url: &str) -> Vec<String> {
    let mut variations = vec![url.to_string()];

    let url_lower = url.to_lowercase();
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    if url_lower.ends_with(".md") || url_lower.ends_with(".txt") {
        return variations;
    }

    let base = url.trim_end_matches('/');
    variations.push(format!("{base}.md"));
    variations.push(format!("{base}/index.md"));

    variations
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Option<FetchResult> {
    let response = client
        .get(url)
        .header(
            "Accept",
            "text/markdown, text/x-markdown, text/plain, text/html;q=0.5, */*;q=0.1",
        )
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        debug!("{url} answered {}", response.status());
        return None;
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let content = response.text().await.ok()?;
    Some(FetchResult {
        url: url.to_string(),
        content,
        is_html: content_type.contains("text/html"),
        is_markdown: content_type.contains("text/markdown")
            || content_type.contains("text/x-markdown"),
    })
}

/// Picks the first Markdown answer in variation order, falling back to the
/// first answer of any kind.
fn choose_document(results: Vec<FetchResult>) -> Option<FetchedDocument> {
    let index = results
        .iter()
        .position(FetchResult::is_markdown_source)
        .unwrap_or(0);
    let result = results.into_iter().nth(index)?;

    let converted_from_html = result.is_html && !result.is_markdown_source();
    let markdown = if converted_from_html {
        html2md::parse_html(&result.content)
    } else {
        result.content
    };

    Some(FetchedDocument {
        url: result.url,
        markdown,
        converted_from_html,
    })
}

pub async fn fetch_markdown(client: &reqwest::Client, url: &str) -> Result<FetchedDocument> {
    url::Url::parse(url)?;

    let variations = get_url_variations(url);
    let mut fetch_tasks = Vec::new();
    for variation in &variations {
        let client_clone = client.clone();
        let url_clone = variation.clone();
        fetch_tasks.push(tokio::spawn(async move {
            fetch_url(&client_clone, &url_clone).await
        }));
    }

    let mut results = Vec::new();
    for task in fetch_tasks {
        if let Ok(Some(result)) = task.await {
            results.push(result);
        }
    }
    debug!("{} of {} variations answered for {url}", results.len(), variations.len());

    choose_document(results).ok_or_else(|| Error::Fetch(url.to_string()))
}
