//! Web search, page scraping and nearby-places lookup.
//!
//! Implementations: `MockWebSearch` / `MockPlaces` and `SerperClient` (feature `remote`),
//! which implements both traits.

mod mock;

#[cfg(feature = "remote")]
mod serper;

pub use mock::{MockPlaces, MockWebSearch};

#[cfg(feature = "remote")]
pub use serper::SerperClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::media::GeoPoint;

/// One organic search result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: None,
        }
    }
}

/// One place from a map search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub title: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Organic results for `query`, best first. Fails with `CollaboratorError::Search`.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError>;

    /// Main text of the page at `link`; `None` when the page has no extractable text.
    async fn scrape(&self, link: &str) -> Result<Option<String>, CollaboratorError>;
}

#[async_trait]
pub trait PlacesSearch: Send + Sync {
    /// Places matching `query` around `location`. Fails with `CollaboratorError::Places`.
    async fn nearby(&self, query: &str, location: GeoPoint) -> Result<Vec<Place>, CollaboratorError>;
}
