use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::media::GeoPoint;

use super::{Place, PlacesSearch, SearchHit, WebSearch};

/// Mock search engine: fixed hits, pages keyed by link, optional failure; counts calls.
#[derive(Default)]
pub struct MockWebSearch {
    hits: Vec<SearchHit>,
    pages: HashMap<String, String>,
    error: Option<CollaboratorError>,
    search_calls: AtomicUsize,
    scrape_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockWebSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Every search and scrape fails with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Text returned when `link` is scraped. Unknown links scrape to `None`.
    pub fn with_page(mut self, link: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(link.into(), text.into());
        self
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn scrape_count(&self) -> usize {
        self.scrape_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, CollaboratorError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.hits.clone()),
        }
    }

    async fn scrape(&self, link: &str) -> Result<Option<String>, CollaboratorError> {
        self.scrape_calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.pages.get(link).cloned()),
        }
    }
}

/// Mock places lookup: fixed places or failure; counts calls.
#[derive(Default)]
pub struct MockPlaces {
    places: Vec<Place>,
    error: Option<CollaboratorError>,
    calls: AtomicUsize,
}

impl MockPlaces {
    pub fn new(places: Vec<Place>) -> Self {
        Self {
            places,
            ..Self::default()
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesSearch for MockPlaces {
    async fn nearby(&self, _query: &str, _location: GeoPoint) -> Result<Vec<Place>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.places.clone()),
        }
    }
}
