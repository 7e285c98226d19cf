//! Traits and interfaces shared by the ranking scrapers and enrichers

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;
use serde::Serialize;
use tracing::info;

use crate::http::HttpClient;

/// Configuration for a ranking page scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name for the ranking
    pub name: String,
    /// Page holding the ranking
    pub page_url: String,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
}

/// CSS selectors for the parts of a ranking page
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Container selector for one ranked group or entry
    pub entry_container: String,
    /// Heading inside the container naming its owner (optional)
    pub heading: Option<String>,
    /// Individual film inside the container (optional; the container itself otherwise)
    pub item: Option<String>,
    /// Rank selector within an item
    pub rank: String,
    /// Title selector within an item (optional; falls back to the image alt text)
    pub title: Option<String>,
    /// Poster image selector within an item
    pub image: String,
    /// Block listing the long tail of the ranking as plain spans (optional)
    pub overflow_container: Option<String>,
}

/// Trait for ranking page scrapers
#[async_trait]
pub trait RankingScraper: Send + Sync {
    /// Row type written to the output CSV
    type Row: Serialize + Send;

    /// Get the configuration for this scraper
    fn config(&self) -> &ScraperConfig;

    /// Extract all rows from a parsed ranking page
    ///
    /// # Arguments
    /// * `document` - The parsed HTML document
    ///
    /// # Returns
    /// * `Result<Vec<Self::Row>>` - Rows in page order, or a selector error
    fn parse_rows(&self, document: &Html) -> Result<Vec<Self::Row>>;

    /// Fetch the ranking page and extract its rows
    async fn scrape(&self, http: &HttpClient) -> Result<Vec<Self::Row>> {
        let config = self.config();
        info!("Fetching {} ranking from {}", config.name, config.page_url);

        let html = http.fetch_text(&config.page_url).await?;

        // Parse in a scope so the document is dropped before returning
        let rows = {
            let document = Html::parse_document(&html);
            self.parse_rows(&document)?
        };

        info!("Scraped {} rows from {}", rows.len(), config.name);
        Ok(rows)
    }
}

/// A record that flattens into a fixed run of CSV columns
pub trait Tabular {
    /// Column names, in output order
    const COLUMNS: &'static [&'static str];

    /// Cell values aligned with [`Tabular::COLUMNS`]
    fn cells(&self) -> Vec<String>;
}

/// Trait for per-title metadata sources
#[async_trait]
pub trait MovieEnricher: Send + Sync {
    /// Columns appended to each source row on a match
    type Record: Tabular + Send;

    /// Display name used in logs
    fn name(&self) -> &str;

    /// Column whose non-empty value marks a row as already enriched
    fn marker_column(&self) -> &'static str;

    /// Pause after every lookup
    fn request_delay(&self) -> Duration;

    /// Look up a film by title
    ///
    /// # Returns
    /// * `Result<Option<Self::Record>>` - The record, `None` when nothing matched
    async fn lookup(&self, title: &str) -> Result<Option<Self::Record>>;
}
