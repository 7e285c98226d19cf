use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod enrichers;
mod http;
mod images;
mod infobox;
mod jobs;
mod models;
mod pipeline;
mod scrapers;
mod store;
mod traits;

use config::Settings;
use enrichers::{TmdbEnricher, WikipediaEnricher};
use http::HttpClient;
use pipeline::Enrichment;
use scrapers::{CriticsScraper, ReadersScraper};
use traits::RankingScraper;

#[derive(Parser, Debug)]
#[command(name = "movie-enricher")]
#[command(about = "Scrape 21st-century movie rankings and enrich them with TMDB and Wikipedia data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every critic's ballot into a CSV
    ScrapeCritics {
        #[arg(short, long, default_value = "top100.csv")]
        output: PathBuf,
    },
    /// Scrape the readers' top 500 into a CSV
    ScrapeReaders {
        #[arg(short, long, default_value = "top500.csv")]
        output: PathBuf,
    },
    /// Download poster images listed in a ranking CSV
    DownloadImages {
        #[arg(short, long, default_value = "top100.csv")]
        input: PathBuf,
        #[arg(short = 'd', long, default_value = "images")]
        out_dir: PathBuf,
    },
    /// Add TMDB metadata to a ranking CSV
    EnrichTmdb {
        #[arg(short, long, default_value = "top100.csv")]
        input: PathBuf,
        #[arg(short, long, default_value = "top100_enriched.csv")]
        output: PathBuf,
        #[arg(short, long, help = "Only process the first N movies")]
        max_movies: Option<usize>,
    },
    /// Add Wikipedia infobox metadata to a ranking CSV
    EnrichWikipedia {
        #[arg(short, long, default_value = "top100.csv")]
        input: PathBuf,
        #[arg(short, long, default_value = "top100_wikipedia_enriched.csv")]
        output: PathBuf,
        #[arg(short, long, help = "Only process the first N movies")]
        max_movies: Option<usize>,
    },
    /// Tag critics' ballots with each voter's job
    AddJobs {
        #[arg(short, long, default_value = "top100.csv")]
        input: PathBuf,
        #[arg(short, long = "jobs", default_value = "jobs.txt")]
        jobs_file: PathBuf,
        #[arg(short, long, default_value = "top100_jobs.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let http = HttpClient::new(&settings.user_agent)?;

    match cli.command {
        Command::ScrapeCritics { output } => {
            let rows = CriticsScraper::new().scrape(&http).await?;
            store::write_rows(&output, &rows)?;
            info!("Saved {} ballot rows to {}", rows.len(), output.display());
        }
        Command::ScrapeReaders { output } => {
            let rows = ReadersScraper::new().scrape(&http).await?;
            if rows.is_empty() {
                warn!("No movies scraped, nothing will be saved");
            } else {
                store::write_rows(&output, &rows)?;
                info!("Saved {} movies to {}", rows.len(), output.display());
            }
        }
        Command::DownloadImages { input, out_dir } => {
            images::download_posters(&http, &input, &out_dir).await?;
        }
        Command::EnrichTmdb {
            input,
            output,
            max_movies,
        } => {
            let api_key = settings.tmdb_api_key()?;
            info!("API key loaded (length: {})", api_key.len());

            let enricher = TmdbEnricher::new(http, settings.tmdb_base_url.clone(), api_key);
            Enrichment::new(enricher)
                .run(&input, &output, max_movies)
                .await?;
        }
        Command::EnrichWikipedia {
            input,
            output,
            max_movies,
        } => {
            let enricher = WikipediaEnricher::new(http, settings.wikipedia_api_url.clone());
            Enrichment::new(enricher)
                .run(&input, &output, max_movies)
                .await?;
        }
        Command::AddJobs {
            input,
            jobs_file,
            output,
        } => {
            jobs::add_jobs(&input, &jobs_file, &output)?;
        }
    }

    Ok(())
}
