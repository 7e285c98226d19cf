//! Ranking page scrapers and their shared parsing helpers

pub mod critics;
pub mod readers;

use anyhow::Result;
use scraper::{ElementRef, Selector};

pub use critics::CriticsScraper;
pub use readers::ReadersScraper;

/// Rank given to entries whose rank could not be read.
pub const UNRANKED: u32 = 999;

pub(crate) fn parse_selector(selector: &str, what: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} selector: {:?}", what, e))
}

/// Parses a selector the scraper cannot work without.
pub(crate) fn required_selector(selector: Option<&str>, what: &str) -> Result<Selector> {
    let selector = selector.ok_or_else(|| anyhow::anyhow!("No {} selector configured", what))?;
    parse_selector(selector, what)
}

/// Text content with every text node trimmed and joined without separators.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// Rank text such as `"12"` or `"12."`; unreadable ranks sort last.
pub(crate) fn parse_rank(text: &str) -> u32 {
    text.trim()
        .trim_end_matches('.')
        .parse()
        .unwrap_or(UNRANKED)
}

/// Image file stem used to name downloaded posters.
///
/// `https://static01.nyt.com/images/abc123.jpg` gives `abc123`. When the URL
/// yields no usable stem the hex MD5 of the URL is used instead. An empty id
/// would save every such poster as a bare `.png`.
pub fn uniqid_from_url(img_url: &str) -> String {
    if img_url.is_empty() {
        return String::new();
    }

    let stem = img_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.split('.').next())
        .unwrap_or_default();

    if stem.is_empty() {
        format!("{:x}", md5::compute(img_url))
    } else {
        stem.to_string()
    }
}
