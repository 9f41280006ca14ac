//! Startup seeding of the reference knowledge store.

use crate::error::CollaboratorError;
use crate::web::WebSearch;

use super::splitter::{split_text, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use super::{KnowledgeStore, Passage};

/// Public medical reference pages loaded into the reference store.
pub const REFERENCE_URLS: [&str; 4] = [
    "https://www.cdc.gov/coronavirus/2019-ncov/symptoms-testing/symptoms.html",
    "https://www.nhs.uk/common-health-questions/accidents-first-aid-and-treatments/",
    "https://www.mayoclinic.org/symptoms",
    "https://medlineplus.gov/symptoms.html",
];

/// Passages used when no reference page could be loaded.
pub const FALLBACK_PASSAGES: [&str; 3] = [
    "Common symptoms include fever, cough, headache, and fatigue.",
    "Always consult a healthcare professional for medical advice.",
    "Seek immediate medical attention for severe symptoms like chest pain or difficulty breathing.",
];

/// Scrapes `urls`, splits each page into chunks and adds them to `store`.
///
/// Pages that fail to load are skipped with a warning. When nothing loads, the fallback
/// passages are added instead. Returns the number of passages added. Only store failures
/// are returned as errors.
pub async fn seed_reference_store(
    store: &dyn KnowledgeStore,
    web: &dyn WebSearch,
    urls: &[&str],
) -> Result<usize, CollaboratorError> {
    let mut added = 0;
    for url in urls {
        let text = match web.scrape(url).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(url, "reference page has no text");
                continue;
            }
            Err(error) => {
                tracing::warn!(url, %error, "failed to load reference page");
                continue;
            }
        };
        for chunk in split_text(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP) {
            store.add(Passage::new(chunk).with_source(*url)).await?;
            added += 1;
        }
        tracing::info!(url, "loaded reference page");
    }

    if added == 0 {
        for text in FALLBACK_PASSAGES {
            store.add(Passage::new(text).with_source("fallback")).await?;
            added += 1;
        }
        tracing::info!(passages = added, "seeded fallback reference passages");
    }
    Ok(added)
}
