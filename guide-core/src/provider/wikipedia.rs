use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::EncyclopediaProvider;

/// Wikipedia action-API client for introductory extracts. Secondary lookup,
/// keyless; the edition subdomain follows the configured language.
#[derive(Debug, Clone)]
pub struct WikipediaProvider {
    language: String,
    http: Client,
}

impl WikipediaProvider {
    pub fn new(language: String) -> Self {
        Self {
            language,
            http: Client::new(),
        }
    }

    async fn fetch_summary(&self, title: &str) -> Result<Option<String>> {
        let url = format!("https://{}.wikipedia.org/w/api.php", self.language);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts|pageprops"),
                ("exintro", "true"),
                ("explaintext", "true"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .send()
            .await
            .context("Failed to send request to Wikipedia (summary)")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Wikipedia summary request failed with status {status}"
            ));
        }

        let parsed: WikiResponse = res
            .json()
            .await
            .context("Failed to parse Wikipedia summary JSON")?;

        let pages = parsed.query.map(|q| q.pages).unwrap_or_default();
        Ok(summary_from_pages(pages))
    }
}

/// Pick the sole (or first) returned page and take its extract, unless the
/// page is a disambiguation entry, which must not be rendered as a factual
/// excerpt.
fn summary_from_pages(pages: HashMap<String, WikiPage>) -> Option<String> {
    let page = pages.into_values().next()?;

    if page.is_disambiguation() {
        debug!(title = page.title.as_deref(), "encyclopedia lookup resolved to a disambiguation page");
        return None;
    }

    page.extract.filter(|extract| !extract.is_empty())
}

#[derive(Debug, Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: Option<String>,
    extract: Option<String>,
    pageprops: Option<WikiPageProps>,
}

impl WikiPage {
    /// The marker pageprop is present (with an empty value) on
    /// disambiguation pages and absent otherwise.
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
    }
}

#[derive(Debug, Deserialize)]
struct WikiPageProps {
    disambiguation: Option<String>,
}

#[async_trait]
impl EncyclopediaProvider for WikipediaProvider {
    async fn city_summary(&self, title: &str) -> Result<Option<String>> {
        self.fetch_summary(title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages_from(json: &str) -> HashMap<String, WikiPage> {
        let parsed: WikiResponse = serde_json::from_str(json).expect("parse fixture");
        parsed.query.map(|q| q.pages).unwrap_or_default()
    }

    #[test]
    fn returns_extract_for_regular_page() {
        let pages = pages_from(
            r#"{"query": {"pages": {"245621": {
                "pageid": 245621,
                "title": "Lisboa",
                "extract": "Lisboa é a capital de Portugal."
            }}}}"#,
        );

        assert_eq!(
            summary_from_pages(pages),
            Some("Lisboa é a capital de Portugal.".to_string())
        );
    }

    #[test]
    fn suppresses_disambiguation_page_even_with_extract() {
        let pages = pages_from(
            r#"{"query": {"pages": {"1337": {
                "pageid": 1337,
                "title": "Mercúrio",
                "extract": "Mercúrio pode referir-se a:",
                "pageprops": {"disambiguation": ""}
            }}}}"#,
        );

        assert_eq!(summary_from_pages(pages), None);
    }

    #[test]
    fn missing_page_yields_no_summary() {
        let pages = pages_from(
            r#"{"query": {"pages": {"-1": {
                "title": "Xyzzyqq",
                "missing": ""
            }}}}"#,
        );

        assert_eq!(summary_from_pages(pages), None);
    }

    #[test]
    fn empty_extract_yields_no_summary() {
        let pages = pages_from(
            r#"{"query": {"pages": {"42": {
                "pageid": 42,
                "title": "Stub",
                "extract": ""
            }}}}"#,
        );

        assert_eq!(summary_from_pages(pages), None);
    }

    #[test]
    fn unrelated_pageprops_do_not_suppress() {
        let pages = pages_from(
            r#"{"query": {"pages": {"7": {
                "pageid": 7,
                "title": "Porto",
                "extract": "Porto é uma cidade portuguesa.",
                "pageprops": {"wikibase_item": "Q36433"}
            }}}}"#,
        );

        assert_eq!(
            summary_from_pages(pages),
            Some("Porto é uma cidade portuguesa.".to_string())
        );
    }
}
