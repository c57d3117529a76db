use crate::config::Source;
use crate::csv::parse_records;
use crate::record::Record;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed payload from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// `{ "data": [...] }`, with a missing list read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct DataEnvelope {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Fetches raw datasets from remote endpoints or local files.
#[derive(Clone)]
pub struct Upstream {
    client: reqwest::Client,
}

impl Upstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client })
    }

    /// Body of a source as text. Query pairs only apply to remote sources.
    pub async fn fetch_text(&self, source: &Source, query: &[(&str, String)]) -> Result<String, UpstreamError> {
        match source {
            Source::Remote(url) => {
                debug!(%url, "fetching upstream");
                let response = self
                    .client
                    .get(url)
                    .query(query)
                    .send()
                    .await
                    .map_err(|source| UpstreamError::Http { url: url.clone(), source })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(UpstreamError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response
                    .text()
                    .await
                    .map_err(|source| UpstreamError::Http { url: url.clone(), source })
            }
            Source::File(path) => fs::read_to_string(path)
                .await
                .map_err(|source| UpstreamError::Io { path: path.clone(), source }),
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, source: &Source, query: &[(&str, String)]) -> Result<T, UpstreamError> {
        let body = self.fetch_text(source, query).await?;
        serde_json::from_str(&body).map_err(|source_err| UpstreamError::Decode {
            origin: describe(source),
            source: source_err,
        })
    }

    /// Header-keyed CSV rows.
    pub async fn fetch_csv(&self, source: &Source) -> Result<Vec<Record>, UpstreamError> {
        let body = self.fetch_text(source, &[]).await?;
        Ok(parse_records(&body))
    }

    /// Records of a dataset that may legitimately be absent; failures are
    /// logged and read as empty.
    pub async fn fetch_optional(&self, source: &Source) -> Vec<Record> {
        match self.fetch_json::<Vec<Record>>(source, &[]).await {
            Ok(records) => records,
            Err(err) => {
                error!("optional dataset unavailable: {err}");
                Vec::new()
            }
        }
    }
}

fn describe(source: &Source) -> String {
    match source {
        Source::Remote(url) => url.clone(),
        Source::File(path) => path.display().to_string(),
    }
}
