//! Per-title metadata sources used by the enrichment jobs

pub mod tmdb;
pub mod wikipedia;

pub use tmdb::TmdbEnricher;
pub use wikipedia::WikipediaEnricher;
