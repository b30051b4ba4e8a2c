//! HTTP client for the contractor search and detail endpoints.

use async_trait::async_trait;
use safecontractor_core::{
    ClientConfig, ContractorDetail, QueryBuilder, SearchInput, SearchQuery, SearchResultItem,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{ClientError, ContractorService};

/// HTTP client for the SafeContractor service.
///
/// Stateless apart from the connection pool: nothing is cached between calls.
pub struct SearchClient {
    client: reqwest::Client,
    config: ClientConfig,
}

/// `{ "detail": ... }` error body. FastAPI validation errors put a list in
/// `detail`, so anything but a non-empty string is ignored.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// A search response is either a single object or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl SearchClient {
    /// Create a client for `config.base_url`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let config = config.normalized();
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn query_builder(&self) -> QueryBuilder {
        self.config.query_builder()
    }

    /// Build a query from raw input and run it.
    ///
    /// Blank input returns an empty list without touching the network.
    pub async fn search_input(
        &self,
        input: &SearchInput,
    ) -> Result<Vec<SearchResultItem>, ClientError> {
        match self.query_builder().build(input) {
            Some(query) => self.search(&query).await,
            None => Ok(Vec::new()),
        }
    }

    /// Endpoint URL for `query`: the fuzzy-match endpoint for fuzzy name
    /// queries, the list-search endpoint otherwise.
    pub fn search_url(&self, query: &SearchQuery) -> String {
        let endpoint = if query.is_fuzzy() {
            self.config.fuzzy_url()
        } else {
            self.config.search_url()
        };
        format!("{endpoint}?{}", query.to_query_string())
    }

    pub fn detail_url(&self, contractor_name: &str) -> String {
        format!(
            "{}?contractor_name={}",
            self.config.detail_url(),
            urlencoding::encode(contractor_name)
        )
    }

    /// GET `url` and return the body of a 2xx response.
    async fn get_body(&self, url: &str) -> Result<String, ClientError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &body);
            warn!(
                url = %url,
                status = status.as_u16(),
                message = %message,
                "service returned an error"
            );
            return Err(ClientError::Remote(message));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl ContractorService for SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>, ClientError> {
        let url = self.search_url(query);

        info!(url = %url, mode = ?query.mode(), fuzzy = query.is_fuzzy(), "searching contractors");
        let body = self.get_body(&url).await?;
        let items = decode_results(&body)?;
        info!(count = items.len(), "search complete");
        Ok(items)
    }

    async fn detail(&self, contractor_name: &str) -> Result<ContractorDetail, ClientError> {
        let url = self.detail_url(contractor_name);

        info!(url = %url, "fetching contractor detail");
        let body = self.get_body(&url).await?;
        let mut detail = decode_detail(&body)?;
        if detail.name.is_empty() {
            detail.name = contractor_name.to_string();
        }
        info!(
            name = %detail.name,
            projects = detail.total_projects(),
            "fetched contractor detail"
        );
        Ok(detail)
    }
}

/// Message reported for a non-2xx response.
///
/// Uses the body's `detail` string when it decodes, else the generic
/// "HTTP error! Status: <code>". Never fails.
pub fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| match d {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        });
    detail.unwrap_or_else(|| format!("HTTP error! Status: {status}"))
}

/// Decode a search body, normalizing a single object to a one-element list.
///
/// An empty body or `null` is an empty list.
pub fn decode_results(body: &str) -> Result<Vec<SearchResultItem>, ClientError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Option<OneOrMany<SearchResultItem>> = serde_json::from_str(body)?;
    Ok(parsed.map(Vec::from).unwrap_or_default())
}

/// Decode a detail body. An empty body, `null`, or an object carrying none
/// of the record keys is [`ClientError::NotFound`]; any other non-object
/// body is a decode error.
pub fn decode_detail(body: &str) -> Result<ContractorDetail, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::NotFound);
    }
    let value: serde_json::Value = serde_json::from_str(body)?;
    match &value {
        serde_json::Value::Null => return Err(ClientError::NotFound),
        serde_json::Value::Object(fields) => {
            if !fields.keys().any(|k| ContractorDetail::is_wire_key(k)) {
                return Err(ClientError::NotFound);
            }
        }
        _ => {
            return Err(ClientError::Decode(serde::de::Error::custom(
                "expected a contractor object",
            )));
        }
    }
    Ok(serde_json::from_value(value)?)
}
