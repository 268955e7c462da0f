use thiserror::Error;
use tracing::{debug, info};

use crate::fetcher::{self, FetchError};
use crate::filter;
use crate::output::{self, OutputFormat};

#[derive(Clone, Debug)]
pub struct Options {
    pub api_base: String,
    pub dataset: String,
    pub where_clause: String,
    pub limit: usize,
    pub filter_needle: String,
    pub timeout_seconds: u64,
    pub output: Option<String>,
    pub format: OutputFormat,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_base: fetcher::API_BASE.to_string(),
            dataset: fetcher::DEFAULT_DATASET.to_string(),
            where_clause: fetcher::DEFAULT_WHERE.to_string(),
            limit: fetcher::DEFAULT_LIMIT,
            filter_needle: filter::DEFAULT_NEEDLE.to_string(),
            timeout_seconds: fetcher::DEFAULT_TIMEOUT_SECONDS,
            output: None,
            format: OutputFormat::Html,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("dataset id is empty")]
    EmptyDataset,

    #[error("invalid limit {value}, expected 1..=100")]
    InvalidLimit { value: usize },

    #[error("invalid timeout, expected positive number of seconds")]
    InvalidTimeout,

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to write output: {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rendered { rows: usize },
    NoData,
}

pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.dataset.trim().is_empty() {
            return Err(RunnerError::EmptyDataset);
        }
        // One fixed-size page; the portal caps page size at 100 anyway.
        if options.limit == 0 || options.limit > fetcher::DEFAULT_LIMIT {
            return Err(RunnerError::InvalidLimit {
                value: options.limit,
            });
        }
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout);
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    // The whole pipeline: one fetch, one client-side filter, one full-replace
    // render. On any fetch or decode failure nothing is written.
    pub async fn run(&self) -> Result<Outcome, RunnerError> {
        let url = fetcher::records_url(
            &self.options.api_base,
            &self.options.dataset,
            &self.options.where_clause,
            self.options.limit,
        );
        debug!(%url, "requesting dataset page");

        let client = fetcher::build_client(self.options.timeout_seconds)
            .map_err(|source| RunnerError::HttpClientBuild { source })?;
        let envelope = fetcher::fetch_envelope(&client, &url).await?;

        let records = envelope.records.unwrap_or_default();
        info!(total = records.len(), "dataset page fetched");

        let matched = filter::matching_records(records, &self.options.filter_needle);
        debug!(matched = matched.len(), needle = %self.options.filter_needle, "client-side filter applied");

        let rows = output::build_rows(&matched);
        let bytes = output::render(&rows, self.options.format, &self.options.filter_needle);
        self.write_output(&bytes).await?;

        if rows.is_empty() {
            Ok(Outcome::NoData)
        } else {
            Ok(Outcome::Rendered { rows: rows.len() })
        }
    }

    async fn write_output(&self, bytes: &[u8]) -> Result<(), RunnerError> {
        match self.options.output.as_deref() {
            Some(path) => {
                tokio::fs::write(path, bytes)
                    .await
                    .map_err(|source| RunnerError::OutputWrite {
                        path: path.to_string(),
                        source,
                    })
            }
            None => {
                use std::io::Write;
                std::io::stdout()
                    .write_all(bytes)
                    .map_err(|source| RunnerError::OutputWrite {
                        path: "<stdout>".to_string(),
                        source,
                    })
            }
        }
    }
}
