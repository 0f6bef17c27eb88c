use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};

/// A paginated source of raw search documents.
///
/// An empty page means the search is exhausted. `AppError::Overloaded`
/// signals a "come back later" answer that should not count as a failure.
#[allow(async_fn_in_trait)]
pub trait SearchSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Value>>;
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: Option<SearchResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<Value>>,
}

/// Client for the archive's advanced search endpoint.
pub struct ArchiveClient {
    client: Client,
    search_url: String,
    query: String,
    fields: String,
    sort: String,
    rows: u32,
}

impl ArchiveClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Fail on a bad endpoint now rather than on the first page.
        Url::parse(&config.search_url)?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            query: config.query.clone(),
            fields: config.fields.join(","),
            sort: config.sort.clone(),
            rows: config.page_size,
        })
    }

    pub fn page_url(&self, page: u32) -> Result<Url> {
        let rows = self.rows.to_string();
        let page = page.to_string();
        let url = Url::parse_with_params(
            &self.search_url,
            &[
                ("q", self.query.as_str()),
                ("fl", self.fields.as_str()),
                ("sort", self.sort.as_str()),
                ("output", "json"),
                ("rows", rows.as_str()),
                ("page", page.as_str()),
            ],
        )?;
        Ok(url)
    }
}

impl SearchSource for ArchiveClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Value>> {
        let url = self.page_url(page)?;
        let response = self.client.get(url).send().await?;

        check_status(response.status())?;

        let bytes = response.bytes().await?;
        parse_search_body(&bytes)
    }
}

/// 507 means the search backend wants us to come back later.
fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::INSUFFICIENT_STORAGE {
        return Err(AppError::Overloaded);
    }
    if !status.is_success() {
        return Err(AppError::Status(status.as_u16()));
    }
    Ok(())
}

/// Extracts the document list from a search response body. Absent, null
/// and empty `docs` all mean the search is exhausted.
fn parse_search_body(body: &[u8]) -> Result<Vec<Value>> {
    let envelope: SearchEnvelope = serde_json::from_slice(body)?;
    envelope
        .response
        .map(|r| r.docs.unwrap_or_default())
        .ok_or_else(|| AppError::MalformedResponse("missing \"response\" object".to_string()))
}
