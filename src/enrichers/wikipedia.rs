//! Wikipedia lookup: search, intro extract, and infobox wikitext

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http::HttpClient;
use crate::infobox::{RawInfobox, WikipediaRecord};
use crate::models::WikiPage;
use crate::traits::MovieEnricher;

const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: HashMap<String, PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    extract: String,
    original: Option<PageImage>,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    source: String,
}

#[derive(Debug, Deserialize)]
struct Revision {
    #[serde(rename = "*", default)]
    content: String,
}

impl PagesQuery {
    /// The API keys pages by id; title queries return exactly one.
    fn into_first_page(self) -> PageInfo {
        self.pages.into_values().next().unwrap_or_default()
    }
}

/// Film lookup against the MediaWiki API
pub struct WikipediaEnricher {
    http: HttpClient,
    api_url: String,
}

impl WikipediaEnricher {
    pub fn new(http: HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    /// Finds the best article for a film title, with its intro and image.
    pub async fn search_page(&self, title: &str) -> Result<Option<WikiPage>> {
        let search_term = format!("{title} film");
        let response: SearchResponse = self
            .http
            .get_json(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("list", "search"),
                    ("srsearch", search_term.as_str()),
                    ("srlimit", "5"),
                    ("srnamespace", "0"),
                ],
            )
            .await?;

        let Some(hit) = response.query.search.into_iter().next() else {
            return Ok(None);
        };

        let details: PagesResponse = self
            .http
            .get_json(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "extracts|pageimages"),
                    ("titles", hit.title.as_str()),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("piprop", "original"),
                ],
            )
            .await?;
        let info = details.query.into_first_page();

        Ok(Some(WikiPage {
            url: article_url(&hit.title),
            title: hit.title,
            extract: hit.snippet,
            content: info.extract,
            image_url: info.original.map(|image| image.source).unwrap_or_default(),
        }))
    }

    /// Wikitext of the lead section, where the infobox lives.
    pub async fn lead_wikitext(&self, page_title: &str) -> Result<String> {
        let response: PagesResponse = self
            .http
            .get_json(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "revisions"),
                    ("titles", page_title),
                    ("rvprop", "content"),
                    ("rvsection", "0"),
                ],
            )
            .await?;

        let page = response.query.into_first_page();
        page.revisions
            .into_iter()
            .next()
            .map(|revision| revision.content)
            .ok_or_else(|| anyhow::anyhow!("No revisions returned for '{}'", page_title))
    }

    /// Infobox of `page_title`; empty when the wikitext cannot be fetched.
    async fn infobox(&self, page_title: &str) -> RawInfobox {
        match self.lead_wikitext(page_title).await {
            Ok(wikitext) => RawInfobox::from_wikitext(&wikitext),
            Err(e) => {
                warn!("Error getting infobox data for '{}': {:#}", page_title, e);
                RawInfobox::default()
            }
        }
    }
}

#[async_trait]
impl MovieEnricher for WikipediaEnricher {
    type Record = WikipediaRecord;

    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn marker_column(&self) -> &'static str {
        "wikipedia_title"
    }

    fn request_delay(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn lookup(&self, title: &str) -> Result<Option<WikipediaRecord>> {
        let Some(page) = self.search_page(title).await? else {
            return Ok(None);
        };

        let infobox = self.infobox(&page.title).await;
        if infobox.is_empty() {
            debug!("No infobox fields found for '{}'", page.title);
        }

        Ok(Some(WikipediaRecord::assemble(&page, &infobox)))
    }
}

fn article_url(page_title: &str) -> String {
    format!("{ARTICLE_BASE_URL}{}", urlencoding::encode(page_title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_urls_are_percent_encoded() {
        assert_eq!(
            article_url("Parasite (2019 film)"),
            "https://en.wikipedia.org/wiki/Parasite%20%282019%20film%29"
        );
    }

    #[test]
    fn search_response_shape() {
        let json = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":2},"search":[
            {"ns":0,"title":"Tár","pageid":1,"snippet":"<span class=\"searchmatch\">Tár</span> is a 2022"},
            {"ns":0,"title":"Lydia Tár","pageid":2,"snippet":""}]}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.query.search.len(), 2);
        assert_eq!(response.query.search[0].title, "Tár");
    }

    #[test]
    fn empty_search_has_no_hits() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"query":{"search":[]}}"#).unwrap();
        assert!(response.query.search.is_empty());
    }

    #[test]
    fn pages_response_with_extract_and_image() {
        let json = r#"{"query":{"pages":{"6158":{"pageid":6158,"title":"Tár",
            "extract":"Tár is a 2022 psychological drama film.",
            "original":{"source":"https://upload.wikimedia.org/tar.jpg","width":220,"height":326}}}}}"#;
        let page = serde_json::from_str::<PagesResponse>(json)
            .unwrap()
            .query
            .into_first_page();

        assert_eq!(page.extract, "Tár is a 2022 psychological drama film.");
        assert_eq!(page.original.unwrap().source, "https://upload.wikimedia.org/tar.jpg");
    }

    #[test]
    fn pages_response_with_revision_content() {
        let json = r#"{"query":{"pages":{"6158":{"pageid":6158,"title":"Tár","revisions":[
            {"contentformat":"text/x-wiki","contentmodel":"wikitext",
             "*":"{{Infobox film\n| director = [[Todd Field]]\n| runtime = 158 minutes\n}}"}]}}}}"#;
        let page = serde_json::from_str::<PagesResponse>(json)
            .unwrap()
            .query
            .into_first_page();
        let infobox = RawInfobox::from_wikitext(&page.revisions[0].content);

        assert_eq!(infobox.get("director"), "Todd Field");
    }

    #[test]
    fn missing_page_defaults_to_empty() {
        let page = serde_json::from_str::<PagesResponse>(r#"{"query":{"pages":{"-1":{"missing":""}}}}"#)
            .unwrap()
            .query
            .into_first_page();

        assert!(page.extract.is_empty());
        assert!(page.original.is_none());
        assert!(page.revisions.is_empty());
    }
}
