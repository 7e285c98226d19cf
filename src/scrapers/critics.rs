//! Scraper for the critics' ballot page: every voter with their top picks

use anyhow::Result;
use scraper::Html;

use super::{
    UNRANKED, element_text, parse_rank, parse_selector, required_selector, uniqid_from_url,
};
use crate::models::VoterPick;
use crate::traits::{RankingScraper, ScraperConfig, SiteSelectors};

const PAGE_URL: &str =
    "https://www.nytimes.com/interactive/2025/movies/votes-movies-21st-century.html";

/// Scraper for the per-voter ballots page
pub struct CriticsScraper {
    config: ScraperConfig,
}

impl CriticsScraper {
    pub fn new() -> Self {
        let config = ScraperConfig {
            name: "Critics ballots".to_string(),
            page_url: PAGE_URL.to_string(),
            selectors: SiteSelectors {
                entry_container: "div.person-box".to_string(),
                heading: Some("h2".to_string()),
                item: Some(".movies-wrapper .grid-item".to_string()),
                rank: ".top-position span".to_string(),
                title: None,
                image: "img".to_string(),
                overflow_container: None,
            },
        };

        Self { config }
    }
}

impl Default for CriticsScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingScraper for CriticsScraper {
    type Row = VoterPick;

    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn parse_rows(&self, document: &Html) -> Result<Vec<VoterPick>> {
        let selectors = &self.config.selectors;
        let person_selector = parse_selector(&selectors.entry_container, "person")?;
        let name_selector = required_selector(selectors.heading.as_deref(), "name")?;
        let item_selector = required_selector(selectors.item.as_deref(), "grid item")?;
        let rank_selector = parse_selector(&selectors.rank, "rank")?;
        let image_selector = parse_selector(&selectors.image, "image")?;
        let title_selector = selectors
            .title
            .as_deref()
            .map(|s| parse_selector(s, "title"))
            .transpose()?;

        let mut rows = Vec::new();

        for person in document.select(&person_selector) {
            let name = person
                .select(&name_selector)
                .next()
                .map(|el| element_text(&el))
                .unwrap_or_default();

            for item in person.select(&item_selector) {
                let Some(img) = item.select(&image_selector).next() else {
                    continue;
                };

                let rank = item
                    .select(&rank_selector)
                    .next()
                    .map_or(UNRANKED, |el| parse_rank(&element_text(&el)));

                let title = match title_selector.as_ref().and_then(|sel| item.select(sel).next()) {
                    Some(el) => element_text(&el),
                    None => title_from_alt(img.value().attr("alt").unwrap_or_default()),
                };
                let img_url = img.value().attr("src").unwrap_or_default().to_string();
                let uniqid = uniqid_from_url(&img_url);

                rows.push(VoterPick {
                    person: name.clone(),
                    rank,
                    title,
                    img_url,
                    uniqid,
                });
            }
        }

        Ok(rows)
    }
}

/// `"movie cover for Parasite by Bong Joon-ho"` gives `"Parasite"`.
fn title_from_alt(alt: &str) -> String {
    let alt = alt.replace("movie cover for ", "");
    match alt.rsplit_once(" by") {
        Some((title, _)) => title.to_string(),
        None => alt,
    }
}
