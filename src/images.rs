use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::http::HttpClient;
use crate::scrapers::uniqid_from_url;
use crate::store;

#[derive(Debug, Deserialize)]
struct PosterRow {
    #[serde(default)]
    uniqid: String,
    #[serde(default)]
    img_url: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

/// Target file for a poster; the id falls back to one derived from the URL.
fn poster_path(out_dir: &Path, row: &PosterRow) -> PathBuf {
    let id = if row.uniqid.is_empty() {
        uniqid_from_url(&row.img_url)
    } else {
        row.uniqid.clone()
    };
    out_dir.join(format!("{id}.png"))
}

/// Downloads every poster listed in `input` into `out_dir`.
///
/// Rows without an image URL and posters already on disk are skipped. A failed
/// download stops the run.
pub async fn download_posters(
    http: &HttpClient,
    input: &Path,
    out_dir: &Path,
) -> Result<DownloadSummary> {
    let rows: Vec<PosterRow> = store::read_rows(input)?;
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut summary = DownloadSummary::default();

    for row in &rows {
        if row.img_url.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let path = poster_path(out_dir, row);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("Already have {}", path.display());
            summary.skipped += 1;
            continue;
        }

        http.download_to(&row.img_url, &path)
            .await
            .with_context(|| format!("downloading {}", row.img_url))?;
        summary.downloaded += 1;
    }

    info!(
        "Downloaded {} posters to {} ({} skipped)",
        summary.downloaded,
        out_dir.display(),
        summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::serve_once;

    fn write_single_row(input: &Path, img_url: &str) {
        std::fs::write(input, format!("rank,title,img_url,uniqid\n1,Parasite,{img_url},parasite\n"))
            .unwrap();
    }

    #[test]
    fn poster_path_uses_uniqid_then_url() {
        let dir = Path::new("images");
        let row = PosterRow {
            uniqid: "abc".to_string(),
            img_url: "https://static01.nyt.com/images/xyz.jpg".to_string(),
        };
        assert_eq!(poster_path(dir, &row), dir.join("abc.png"));

        let row = PosterRow {
            uniqid: String::new(),
            img_url: "https://static01.nyt.com/images/xyz.jpg".to_string(),
        };
        assert_eq!(poster_path(dir, &row), dir.join("xyz.png"));
    }

    #[tokio::test]
    async fn skips_rows_without_url_and_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top100.csv");
        let out_dir = dir.path().join("images");
        std::fs::create_dir_all(&out_dir).unwrap();
        std::fs::write(out_dir.join("have.png"), b"png").unwrap();
        std::fs::write(
            &input,
            "rank,title,img_url,uniqid\n\
             1,Parasite,https://static01.nyt.com/images/have.jpg,have\n\
             101,The Departed,,\n",
        )
        .unwrap();

        let http = HttpClient::new("test-agent").unwrap();
        let summary = download_posters(&http, &input, &out_dir).await.unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 0,
                skipped: 2
            }
        );
    }

    #[tokio::test]
    async fn failed_download_is_retried_on_the_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("top100.csv");
        let out_dir = dir.path().join("images");
        let http = HttpClient::new("test-agent").unwrap();

        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n0123456789",
        )
        .await;
        write_single_row(&input, &url);
        assert!(download_posters(&http, &input, &out_dir).await.is_err());
        assert!(!out_dir.join("parasite.png").exists());

        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n0123456789",
        )
        .await;
        write_single_row(&input, &url);
        let summary = download_posters(&http, &input, &out_dir).await.unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 1,
                skipped: 0
            }
        );
        assert_eq!(std::fs::read(out_dir.join("parasite.png")).unwrap(), b"0123456789");
    }
}
