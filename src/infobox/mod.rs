//! # Infobox normalization
//!
//! Turns the `{{Infobox film ...}}` block at the top of a Wikipedia article
//! into a flat, typed record. Work happens in two stages:
//!
//! - **Extraction** ([`extract_field`]): pull the raw `key = value` text for one
//!   field and strip tags, references, links and template wrappers.
//! - **Normalization** ([`normalize`]): split name lists, project them onto
//!   fixed slots, and parse running times and money amounts into integers.
//!
//! Every function here is total. A missing field is an empty string and an
//! unparsable number is `None`; nothing in this module returns an error.

use std::collections::BTreeMap;

pub mod extract;
pub mod normalize;
pub mod record;

pub use extract::extract_field;
pub use record::WikipediaRecord;

/// Infobox fields read from every film article.
pub const INFOBOX_FIELDS: [&str; 19] = [
    "director",
    "producer",
    "writer",
    "screenplay",
    "story",
    "starring",
    "music",
    "cinematography",
    "editing",
    "production_company",
    "distributor",
    "release_date",
    "running_time",
    "country",
    "language",
    "budget",
    "box_office",
    "genre",
    "rating",
];

/// Raw, cleaned-but-untyped infobox values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInfobox {
    fields: BTreeMap<&'static str, String>,
}

impl RawInfobox {
    /// Extracts every field in [`INFOBOX_FIELDS`] from article wikitext.
    pub fn from_wikitext(wikitext: &str) -> Self {
        let fields = INFOBOX_FIELDS
            .iter()
            .map(|&name| (name, extract_field(wikitext, name)))
            .collect();

        Self { fields }
    }

    /// Value of `field`, or an empty string when it was not present.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map_or("", String::as_str)
    }

    /// Whether every field came back empty.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(String::is_empty)
    }

    #[cfg(test)]
    pub fn with(mut self, field: &'static str, value: &str) -> Self {
        self.fields.insert(field, value.to_string());
        self
    }
}
