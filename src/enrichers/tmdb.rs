//! TMDB lookup: title search followed by full details with credits

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::http::HttpClient;
use crate::infobox::normalize::to_slots;
use crate::store::optional_cell;
use crate::traits::{MovieEnricher, Tabular};

const KEYWORD_LIMIT: usize = 10;
const BILLED_ACTORS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MovieDetails {
    id: Option<i64>,
    original_title: Option<String>,
    original_language: Option<String>,
    release_date: Option<String>,
    runtime: Option<i64>,
    budget: Option<i64>,
    revenue: Option<i64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    popularity: Option<f64>,
    overview: Option<String>,
    tagline: Option<String>,
    status: Option<String>,
    adult: Option<bool>,
    video: Option<bool>,
    backdrop_path: Option<String>,
    poster_path: Option<String>,
    imdb_id: Option<String>,
    homepage: Option<String>,
    genres: Vec<Named>,
    production_companies: Vec<Named>,
    production_countries: Vec<Named>,
    spoken_languages: Vec<Named>,
    credits: Credits,
    keywords: Keywords,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Credits {
    cast: Vec<Named>,
    crew: Vec<CrewMember>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CrewMember {
    name: String,
    job: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Keywords {
    keywords: Vec<Named>,
}

/// One TMDB row, appended after the source columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TmdbRecord {
    pub tmdb_id: Option<i64>,
    pub original_title: String,
    pub original_language: String,
    pub release_date: String,
    pub runtime: Option<i64>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub overview: String,
    pub tagline: String,
    pub status: String,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    pub backdrop_path: String,
    pub poster_path: String,
    pub imdb_id: String,
    pub homepage: String,
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
    pub keywords: String,
    pub total_cast_count: usize,
    pub total_crew_count: usize,
}

impl From<MovieDetails> for TmdbRecord {
    fn from(details: MovieDetails) -> Self {
        let crew_with = |jobs: &[&str]| -> Vec<String> {
            details
                .credits
                .crew
                .iter()
                .filter(|person| jobs.contains(&person.job.as_str()))
                .map(|person| person.name.clone())
                .collect()
        };
        let names = |list: &[Named]| -> String {
            list.iter()
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let directors = crew_with(&["Director"]);
        let cinematographers = crew_with(&["Director of Photography"]);
        let producers = crew_with(&["Producer"]);
        let writers = crew_with(&["Screenplay", "Writer", "Story"]);
        let composers = crew_with(&["Original Music Composer"]);
        let editors = crew_with(&["Editor"]);
        let actors = details
            .credits
            .cast
            .iter()
            .take(BILLED_ACTORS)
            .map(|person| person.name.clone())
            .collect();

        let keywords = details
            .keywords
            .keywords
            .iter()
            .take(KEYWORD_LIMIT)
            .map(|keyword| keyword.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            tmdb_id: details.id,
            original_title: details.original_title.clone().unwrap_or_default(),
            original_language: details.original_language.clone().unwrap_or_default(),
            release_date: details.release_date.clone().unwrap_or_default(),
            runtime: details.runtime,
            budget: details.budget,
            revenue: details.revenue,
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            overview: details.overview.clone().unwrap_or_default(),
            tagline: details.tagline.clone().unwrap_or_default(),
            status: details.status.clone().unwrap_or_default(),
            adult: details.adult,
            video: details.video,
            backdrop_path: details.backdrop_path.clone().unwrap_or_default(),
            poster_path: details.poster_path.clone().unwrap_or_default(),
            imdb_id: details.imdb_id.clone().unwrap_or_default(),
            homepage: details.homepage.clone().unwrap_or_default(),
            directors,
            actors,
            cinematographers,
            producers,
            writers,
            composers,
            editors,
            genres: names(&details.genres),
            production_companies: names(&details.production_companies),
            production_countries: names(&details.production_countries),
            spoken_languages: names(&details.spoken_languages),
            keywords,
            total_cast_count: details.credits.cast.len(),
            total_crew_count: details.credits.crew.len(),
        }
    }
}

impl Tabular for TmdbRecord {
    const COLUMNS: &'static [&'static str] = &[
        "tmdb_id",
        "original_title",
        "original_language",
        "release_date",
        "runtime",
        "budget",
        "revenue",
        "vote_average",
        "vote_count",
        "popularity",
        "overview",
        "tagline",
        "status",
        "adult",
        "video",
        "backdrop_path",
        "poster_path",
        "imdb_id",
        "homepage",
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
        "keywords",
        "total_cast_count",
        "total_crew_count",
    ];

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            optional_cell(self.tmdb_id),
            self.original_title.clone(),
            self.original_language.clone(),
            self.release_date.clone(),
            optional_cell(self.runtime),
            optional_cell(self.budget),
            optional_cell(self.revenue),
            optional_cell(self.vote_average),
            optional_cell(self.vote_count),
            optional_cell(self.popularity),
            self.overview.clone(),
            self.tagline.clone(),
            self.status.clone(),
            optional_cell(self.adult),
            optional_cell(self.video),
            self.backdrop_path.clone(),
            self.poster_path.clone(),
            self.imdb_id.clone(),
            self.homepage.clone(),
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
            self.keywords.clone(),
            self.total_cast_count.to_string(),
            self.total_crew_count.to_string(),
        ]);
        cells
    }
}

/// Film lookup against The Movie Database v3 API
pub struct TmdbEnricher {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl TmdbEnricher {
    pub fn new(http: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn search_movie(&self, title: &str) -> Result<Option<i64>> {
        let response: SearchResponse = self
            .http
            .get_json(
                &format!("{}/search/movie", self.base_url),
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", title),
                    ("language", "en-US"),
                    ("page", "1"),
                    ("include_adult", "false"),
                ],
            )
            .await?;

        Ok(response.results.first().map(|result| result.id))
    }

    async fn movie_details(&self, movie_id: i64) -> Result<MovieDetails> {
        self.http
            .get_json(
                &format!("{}/movie/{movie_id}", self.base_url),
                &[
                    ("api_key", self.api_key.as_str()),
                    ("language", "en-US"),
                    ("append_to_response", "credits,keywords"),
                ],
            )
            .await
    }
}

#[async_trait]
impl MovieEnricher for TmdbEnricher {
    type Record = TmdbRecord;

    fn name(&self) -> &str {
        "TMDB"
    }

    fn marker_column(&self) -> &'static str {
        "tmdb_id"
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(250)
    }

    async fn lookup(&self, title: &str) -> Result<Option<TmdbRecord>> {
        let Some(movie_id) = self.search_movie(title).await? else {
            return Ok(None);
        };

        let details = self.movie_details(movie_id).await?;
        Ok(Some(TmdbRecord::from(details)))
    }
}
