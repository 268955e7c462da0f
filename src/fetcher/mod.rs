use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

pub const API_BASE: &str = "https://data.gov.bh/api/explore/v2.1/catalog/datasets";

pub const DEFAULT_DATASET: &str = "01-statistics-of-students-nationalities_updated";

// The portal's own query filter. The client-side filter in crate::filter is a
// second, stricter narrowing on top of this one; both layers are kept as-is.
pub const DEFAULT_WHERE: &str = r#"colleges like "IT" AND the_programs like "bachelor""#;

pub const DEFAULT_LIMIT: usize = 100;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// One display field from a dataset record. The portal serves some of these as
// JSON numbers, so everything goes through display_string and comes out as an
// optional string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StudentFields {
    #[serde(default, deserialize_with = "display_string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub the_programs: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub colleges: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecordEntry {
    #[serde(default)]
    pub fields: StudentFields,
}

// Top-level response shape. A missing records list is the no-data condition,
// not a decode failure.
#[derive(Clone, Debug, Deserialize)]
pub struct DatasetEnvelope {
    #[serde(default)]
    pub records: Option<Vec<RecordEntry>>,
}

fn display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode dataset response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

// Everything outside the unreserved set gets percent-encoded, so spaces in
// the where clause become %20 (not +) and match the portal URL byte-for-byte.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn records_url(api_base: &str, dataset: &str, where_clause: &str, limit: usize) -> String {
    format!(
        "{api_base}/{dataset}/records?where={}&limit={limit}",
        utf8_percent_encode(where_clause, QUERY_COMPONENT)
    )
}

pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "studata/",
            env!("CARGO_PKG_VERSION")
        )),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
}

pub async fn fetch_envelope(
    client: &reqwest::Client,
    url: &str,
) -> Result<DatasetEnvelope, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<DatasetEnvelope>()
        .await
        .map_err(|source| FetchError::Decode { source })
}
