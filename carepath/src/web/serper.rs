//! Serper (google.serper.dev) search, map and scrape client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::CollaboratorError;
use crate::http::{default_client, ensure_success, join_url};
use crate::media::GeoPoint;

use super::{Place, PlacesSearch, SearchHit, WebSearch};

const SEARCH_BASE_URL: &str = "https://google.serper.dev";
const SCRAPE_URL: &str = "https://scrape.serper.dev";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    link: Option<String>,
    snippet: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct MapsResponse {
    #[serde(default)]
    places: Vec<MapsPlace>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapsPlace {
    #[serde(default)]
    title: String,
    address: Option<String>,
    phone_number: Option<String>,
    website: Option<String>,
}

/// Implements [`WebSearch`] and [`PlacesSearch`] against the Serper APIs.
pub struct SerperClient {
    client: reqwest::Client,
    api_key: String,
    search_base: String,
    scrape_url: String,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: default_client(),
            api_key: api_key.into(),
            search_base: SEARCH_BASE_URL.to_string(),
            scrape_url: SCRAPE_URL.to_string(),
        }
    }

    /// Overrides both endpoints (search/maps under `search_base`, scraping at `scrape_url`).
    pub fn with_endpoints(mut self, search_base: impl Into<String>, scrape_url: impl Into<String>) -> Self {
        self.search_base = search_base.into();
        self.scrape_url = scrape_url.into();
        self
    }

    async fn post(&self, url: String, body: serde_json::Value) -> Result<reqwest::Response, String> {
        let response = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;
        ensure_success(response, "Serper API").await
    }
}

#[async_trait]
impl WebSearch for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError> {
        let response = self
            .post(join_url(&self.search_base, "search"), json!({ "q": query }))
            .await
            .map_err(CollaboratorError::Search)?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Search(format!("bad response: {}", e)))?;
        Ok(parsed
            .organic
            .into_iter()
            .filter_map(|r| {
                r.link.map(|link| SearchHit {
                    title: r.title,
                    link,
                    snippet: r.snippet,
                })
            })
            .collect())
    }

    async fn scrape(&self, link: &str) -> Result<Option<String>, CollaboratorError> {
        let response = self
            .post(self.scrape_url.clone(), json!({ "url": link }))
            .await
            .map_err(CollaboratorError::Search)?;
        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Search(format!("bad scrape response: {}", e)))?;
        Ok(parsed
            .text
            .or(parsed.content)
            .filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl PlacesSearch for SerperClient {
    async fn nearby(&self, query: &str, location: GeoPoint) -> Result<Vec<Place>, CollaboratorError> {
        let response = self
            .post(
                join_url(&self.search_base, "maps"),
                json!({ "q": query, "ll": location.viewport() }),
            )
            .await
            .map_err(CollaboratorError::Places)?;
        let parsed: MapsResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Places(format!("bad response: {}", e)))?;
        Ok(parsed
            .places
            .into_iter()
            .map(|p| Place {
                title: p.title,
                address: p.address,
                phone: p.phone_number,
                website: p.website,
            })
            .collect())
    }
}
