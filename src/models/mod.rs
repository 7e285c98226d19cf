//! Data models for scraped rankings and looked-up article metadata

use serde::{Deserialize, Serialize};

use crate::traits::Tabular;

/// One film on a voter's ballot from the critics ranking page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterPick {
    pub person: String,
    pub rank: u32,
    pub title: String,
    pub img_url: String,
    pub uniqid: String,
}

/// A voter pick tagged with the voter's job category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffedPick {
    pub person: String,
    pub rank: u32,
    pub title: String,
    pub img_url: String,
    pub uniqid: String,
    pub job: String,
}

/// A ranked film. This is the source row every enrichment joins against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedMovie {
    pub rank: u32,
    pub title: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub uniqid: String,
}

impl Tabular for RankedMovie {
    const COLUMNS: &'static [&'static str] = &["rank", "title", "img_url", "uniqid"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.title.clone(),
            self.img_url.clone(),
            self.uniqid.clone(),
        ]
    }
}

/// Article metadata returned by the Wikipedia search and extract APIs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiPage {
    pub title: String,
    pub url: String,
    /// Search result snippet, HTML highlighting included
    pub extract: String,
    /// Plain-text intro section
    pub content: String,
    pub image_url: String,
}
