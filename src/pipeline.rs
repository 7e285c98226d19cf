use std::path::Path;

use anyhow::Result;
use tracing::{error, info};

use crate::models::RankedMovie;
use crate::store::{self, ExistingTable, TableWriter};
use crate::traits::{MovieEnricher, Tabular};

/// Counts reported at the end of an enrichment run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub processed: usize,
    pub skipped: usize,
    pub unmatched: usize,
}

/// Sequential enrichment of a ranking CSV through one metadata source.
pub struct Enrichment<E> {
    enricher: E,
}

impl<E: MovieEnricher> Enrichment<E> {
    pub fn new(enricher: E) -> Self {
        Self { enricher }
    }

    /// Enriches `input` into `output`.
    ///
    /// Rows already enriched in a previous `output` are carried over without a
    /// lookup. Lookup failures are logged and the row is kept unenriched.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        max_movies: Option<usize>,
    ) -> Result<EnrichmentSummary> {
        let mut movies: Vec<RankedMovie> = store::read_rows(input)?;
        if let Some(max) = max_movies {
            movies.truncate(max);
        }

        let existing = ExistingTable::load(output);
        let marker = self.enricher.marker_column();
        let header: Vec<&str> = RankedMovie::COLUMNS
            .iter()
            .chain(<E::Record as Tabular>::COLUMNS.iter())
            .copied()
            .collect();

        info!(
            "Enriching {} movies from {} with {}",
            movies.len(),
            input.display(),
            self.enricher.name()
        );

        let mut summary = EnrichmentSummary::default();
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(movies.len());

        for (index, movie) in movies.iter().enumerate() {
            info!("Processing {}/{}: {}", index + 1, movies.len(), movie.title);

            if let Some(previous) = existing.enriched_row(&movie.title, marker) {
                info!("Skipping {} - already enriched", movie.title);
                rows.push(
                    header
                        .iter()
                        .map(|column| previous.get(*column).cloned().unwrap_or_default())
                        .collect(),
                );
                summary.skipped += 1;
                continue;
            }

            let mut cells = movie.cells();
            match self.enricher.lookup(&movie.title).await {
                Ok(Some(record)) => {
                    cells.extend(record.cells());
                    summary.processed += 1;
                }
                Ok(None) => {
                    info!("No {} match found for {}", self.enricher.name(), movie.title);
                    summary.unmatched += 1;
                }
                Err(e) => {
                    error!(
                        "Error looking up '{}' on {}: {:#}",
                        movie.title,
                        self.enricher.name(),
                        e
                    );
                    summary.unmatched += 1;
                }
            }
            rows.push(cells);

            tokio::time::sleep(self.enricher.request_delay()).await;
        }

        let mut writer = TableWriter::create(output, &header)?;
        for row in rows {
            writer.write(row)?;
        }
        writer.finish()?;

        info!("Enriched data saved to {}", output.display());
        info!(
            "Summary: {} new movies processed, {} movies skipped (already enriched), {} without a match",
            summary.processed, summary.skipped, summary.unmatched
        );

        Ok(summary)
    }
}
