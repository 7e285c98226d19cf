//! Scraper for the readers' poll: a top 100 with posters, then a plain list to 500

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{UNRANKED, element_text, parse_rank, parse_selector, uniqid_from_url};
use crate::models::RankedMovie;
use crate::traits::{RankingScraper, ScraperConfig, SiteSelectors};

const PAGE_URL: &str =
    "https://www.nytimes.com/interactive/2025/movies/readers-movies-21st-century.html";

static RANK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("valid rank prefix pattern"));

/// Scraper for the readers' ranking page
pub struct ReadersScraper {
    config: ScraperConfig,
}

impl ReadersScraper {
    pub fn new() -> Self {
        let config = ScraperConfig {
            name: "Readers poll".to_string(),
            page_url: PAGE_URL.to_string(),
            selectors: SiteSelectors {
                entry_container: "div.row-outer.svelte-1l6f6x5".to_string(),
                heading: None,
                item: None,
                rank: ".rank.svelte-1l6f6x5".to_string(),
                title: Some("h3.svelte-1l6f6x5".to_string()),
                image: "img".to_string(),
                overflow_container: Some("p.rest.svelte-nxbyro".to_string()),
            },
        };

        Self { config }
    }

    /// Entries past the top 100: `<span><span class="num">101.</span> <a>Title</a></span>`.
    fn parse_overflow(&self, paragraph: &ElementRef, rows: &mut Vec<RankedMovie>) -> Result<()> {
        let span_selector = parse_selector("span", "overflow span")?;
        let num_selector = parse_selector("span.num", "overflow rank")?;
        let link_selector = parse_selector("a", "overflow title")?;

        for span in paragraph.select(&span_selector) {
            let Some(num) = span.select(&num_selector).next() else {
                continue;
            };
            let Ok(rank) = element_text(&num).trim_end_matches('.').parse::<u32>() else {
                continue;
            };
            let Some(link) = span.select(&link_selector).next() else {
                continue;
            };

            rows.push(RankedMovie {
                rank,
                title: element_text(&link),
                img_url: String::new(),
                uniqid: String::new(),
            });
        }

        Ok(())
    }
}

impl Default for ReadersScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingScraper for ReadersScraper {
    type Row = RankedMovie;

    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn parse_rows(&self, document: &Html) -> Result<Vec<RankedMovie>> {
        let selectors = &self.config.selectors;
        let row_selector = parse_selector(&selectors.entry_container, "row")?;
        let rank_selector = parse_selector(&selectors.rank, "rank")?;
        let title_selector = selectors
            .title
            .as_deref()
            .map(|s| parse_selector(s, "title"))
            .transpose()?;
        let image_selector = parse_selector(&selectors.image, "image")?;
        let overflow_selector: Option<Selector> = selectors
            .overflow_container
            .as_deref()
            .map(|s| parse_selector(s, "overflow"))
            .transpose()?;

        let mut rows = Vec::new();

        for row in document.select(&row_selector) {
            let Some(img) = row.select(&image_selector).next() else {
                continue;
            };

            let rank = row
                .select(&rank_selector)
                .next()
                .map_or(UNRANKED, |el| parse_rank(&element_text(&el)));

            let title = title_selector
                .as_ref()
                .and_then(|sel| row.select(sel).next())
                .map(|el| RANK_PREFIX.replace(&element_text(&el), "").into_owned())
                .unwrap_or_default();

            let img_url = img.value().attr("src").unwrap_or_default().to_string();
            let uniqid = uniqid_from_url(&img_url);

            rows.push(RankedMovie {
                rank,
                title,
                img_url,
                uniqid,
            });
        }

        if let Some(ref overflow_sel) = overflow_selector
            && let Some(paragraph) = document.select(overflow_sel).next()
        {
            self.parse_overflow(&paragraph, &mut rows)?;
        }

        rows.sort_by_key(|row| row.rank);
        Ok(rows)
    }
}
