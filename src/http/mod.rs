use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Shared HTTP client for page fetches, API calls and image downloads.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self { client })
    }

    /// Fetches a page body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch {}: {}",
                url,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }

    /// Calls a JSON API with query parameters.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Request to {} failed: {}",
                url,
                response.status()
            ));
        }

        Ok(response.json::<T>().await?)
    }

    /// Streams the body at `url` into `path`, returning the byte count.
    ///
    /// The body is written to a `.part` sibling and renamed into place once
    /// complete, so a failed transfer never leaves a truncated `path` behind.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        let partial = partial_path(path);

        let written = match self.stream_to(url, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {}: {}", partial.display(), cleanup);
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, path)
            .await
            .with_context(|| format!("moving {} into place", partial.display()))?;

        debug!("Wrote {} bytes to {}", written, path.display());
        Ok(written)
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<u64> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = File::create(path)
            .await
            .with_context(|| format!("creating {}", path.display()))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// One-shot HTTP server on localhost that answers the first request with
/// `response` verbatim and then closes the connection.
#[cfg(test)]
pub(crate) async fn serve_once(response: &'static [u8]) -> String {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket.write_all(response).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/poster.jpg")
}
