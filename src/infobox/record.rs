//! Assembly of the flat Wikipedia output row

use crate::models::WikiPage;
use crate::store::optional_cell;
use crate::traits::Tabular;

use super::RawInfobox;
use super::normalize::{parse_list_field, parse_monetary, parse_runtime, parse_writers, to_slots};

/// One normalized Wikipedia row, ready to be appended after the source columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikipediaRecord {
    pub wikipedia_title: String,
    pub wikipedia_url: String,
    pub wikipedia_extract: String,
    pub wikipedia_content: String,
    pub wikipedia_image_url: String,
    pub release_date: String,
    pub runtime: Option<i64>,
    pub budget: Option<i64>,
    pub box_office: Option<i64>,
    pub rating: String,
    pub directors: Vec<String>,
    pub actors: Vec<String>,
    pub cinematographers: Vec<String>,
    pub producers: Vec<String>,
    pub writers: Vec<String>,
    pub composers: Vec<String>,
    pub editors: Vec<String>,
    pub genres: String,
    pub production_companies: String,
    pub production_countries: String,
    pub spoken_languages: String,
    pub distributor: String,
    pub total_actors_count: usize,
    pub total_crew_count: usize,
}

impl WikipediaRecord {
    /// Normalizes the infobox of `page` into a record.
    pub fn assemble(page: &WikiPage, infobox: &RawInfobox) -> Self {
        let actors = parse_list_field(infobox.get("starring"));
        let directors = parse_list_field(infobox.get("director"));
        let writers = parse_writers(
            infobox.get("writer"),
            infobox.get("screenplay"),
            infobox.get("story"),
        );
        let producers = parse_list_field(infobox.get("producer"));
        let cinematographers = parse_list_field(infobox.get("cinematography"));
        let composers = parse_list_field(infobox.get("music"));
        let editors = parse_list_field(infobox.get("editing"));

        let total_crew_count = directors.len()
            + writers.len()
            + producers.len()
            + cinematographers.len()
            + composers.len()
            + editors.len();

        Self {
            wikipedia_title: page.title.clone(),
            wikipedia_url: page.url.clone(),
            wikipedia_extract: page.extract.clone(),
            wikipedia_content: page.content.clone(),
            wikipedia_image_url: page.image_url.clone(),
            release_date: infobox.get("release_date").to_string(),
            runtime: parse_runtime(infobox.get("running_time")),
            budget: parse_monetary(infobox.get("budget")),
            box_office: parse_monetary(infobox.get("box_office")),
            rating: infobox.get("rating").to_string(),
            genres: joined(infobox.get("genre")),
            production_companies: joined(infobox.get("production_company")),
            production_countries: joined(infobox.get("country")),
            spoken_languages: joined(infobox.get("language")),
            distributor: infobox.get("distributor").to_string(),
            total_actors_count: actors.len(),
            total_crew_count,
            directors,
            actors,
            cinematographers,
            producers,
            writers,
            composers,
            editors,
        }
    }
}

fn joined(raw: &str) -> String {
    parse_list_field(raw).join(", ")
}

impl Tabular for WikipediaRecord {
    const COLUMNS: &'static [&'static str] = &[
        "wikipedia_title",
        "wikipedia_url",
        "wikipedia_extract",
        "wikipedia_content",
        "wikipedia_image_url",
        "release_date",
        "runtime",
        "budget",
        "box_office",
        "rating",
        "director_1",
        "director_2",
        "director_3",
        "actor_1",
        "actor_2",
        "actor_3",
        "actor_4",
        "actor_5",
        "cinematographer_1",
        "cinematographer_2",
        "producer_1",
        "producer_2",
        "producer_3",
        "writer_1",
        "writer_2",
        "writer_3",
        "composer_1",
        "composer_2",
        "editor_1",
        "editor_2",
        "genres",
        "production_companies",
        "production_countries",
        "spoken_languages",
        "distributor",
        "total_actors_count",
        "total_crew_count",
    ];

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.wikipedia_title.clone(),
            self.wikipedia_url.clone(),
            self.wikipedia_extract.clone(),
            self.wikipedia_content.clone(),
            self.wikipedia_image_url.clone(),
            self.release_date.clone(),
            optional_cell(self.runtime),
            optional_cell(self.budget),
            optional_cell(self.box_office),
            self.rating.clone(),
        ];
        cells.extend(to_slots(&self.directors, 3));
        cells.extend(to_slots(&self.actors, 5));
        cells.extend(to_slots(&self.cinematographers, 2));
        cells.extend(to_slots(&self.producers, 3));
        cells.extend(to_slots(&self.writers, 3));
        cells.extend(to_slots(&self.composers, 2));
        cells.extend(to_slots(&self.editors, 2));
        cells.extend([
            self.genres.clone(),
            self.production_companies.clone(),
            self.production_countries.clone(),
            self.spoken_languages.clone(),
            self.distributor.clone(),
            self.total_actors_count.to_string(),
            self.total_crew_count.to_string(),
        ]);
        cells
    }
}
