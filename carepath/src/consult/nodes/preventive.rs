//! Preventive branch: keyword screen, web-grounded guidance, video links.

use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::messages::{
    asks_for_prevention, disease_prompt, preventive_answer_prompt, ASK_PREVENTIVE,
    COMPLETION_APOLOGY, NOTHING_FOUND, NO_VIDEOS, PREVENTIVE_HEADER, SEARCH_APOLOGY,
    VIDEO_APOLOGY,
};
use crate::consult::state::{ConsultState, Patch, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::knowledge::splitter::{split_text, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::knowledge::{KnowledgeStore, Passage};
use crate::llm::LlmClient;
use crate::web::WebSearch;

use super::RETRIEVAL_K;

/// Pages scraped when the cache has nothing for a query.
pub const MAX_SCRAPED_PAGES: usize = 5;
/// Video links listed in the answer.
pub const MAX_VIDEO_LINKS: usize = 3;

/// Lets only prevention questions through; the image input is dropped either way.
///
/// Without a prevention keyword the run ends with a clarification and no audio. No
/// collaborator is involved.
pub struct ScreenNode;

impl ScreenNode {
    pub const ID: &'static str = "screen";
}

#[async_trait]
impl Node<ConsultState> for ScreenNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::TranscribedText])
            .writes([StateField::ImageInput])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        if asks_for_prevention(state.query()) {
            return Ok((StateUpdate::new().clear_image(), Next::Continue));
        }
        Ok((
            StateUpdate::new()
                .clear_image()
                .response_text(ASK_PREVENTIVE)
                .response_audio(Patch::Clear),
            Next::End,
        ))
    }
}

/// Builds the "From the web" section.
///
/// Names the disease in the query, then looks it up in the preventive cache. On a miss it
/// searches the web for that disease, scrapes the top pages into the cache and answers over
/// them. The cache is keyed by disease, not by the wording of the question, so questions
/// about other diseases never reuse a cached page.
pub struct GuidanceNode {
    llm: Arc<dyn LlmClient>,
    cache: Arc<dyn KnowledgeStore>,
    web: Arc<dyn WebSearch>,
}

impl GuidanceNode {
    pub const ID: &'static str = "guidance";

    pub fn new(
        llm: Arc<dyn LlmClient>,
        cache: Arc<dyn KnowledgeStore>,
        web: Arc<dyn WebSearch>,
    ) -> Self {
        Self { llm, cache, web }
    }

    async fn disease(&self, query: &str) -> String {
        match self.llm.complete(&disease_prompt(query), None).await {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            Ok(_) => query.to_string(),
            Err(error) => {
                tracing::warn!(%error, "disease identification failed, searching with the query");
                query.to_string()
            }
        }
    }

    async fn cached(&self, query: &str) -> Vec<String> {
        match self.cache.search(query, RETRIEVAL_K).await {
            Ok(passages) => passages.into_iter().map(|p| p.text).collect(),
            Err(error) => {
                tracing::warn!(%error, "preventive cache lookup failed");
                Vec::new()
            }
        }
    }

    /// Scrapes the first pages for `search_query` into the cache and returns the chunks.
    async fn scrape_into_cache(&self, search_query: &str) -> Result<Vec<String>, String> {
        let hits = self.web.search(search_query).await.map_err(|e| e.to_string())?;
        tracing::debug!(links = hits.len(), "preventive search results");
        let mut chunks = Vec::new();
        for hit in hits.iter().take(MAX_SCRAPED_PAGES) {
            let text = match self.web.scrape(&hit.link).await {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(link = %hit.link, %error, "scrape failed");
                    continue;
                }
            };
            for chunk in split_text(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP) {
                let passage = Passage::new(chunk.clone()).with_source(hit.link.clone());
                if let Err(error) = self.cache.add(passage).await {
                    tracing::warn!(%error, "failed to cache scraped passage");
                }
                chunks.push(chunk);
            }
        }
        Ok(chunks)
    }

    async fn guidance(&self, query: &str) -> String {
        let disease = self.disease(query).await;
        let mut context = self.cached(&disease).await;
        if context.is_empty() {
            let scraped = match self
                .scrape_into_cache(&format!("{} preventive measures", disease))
                .await
            {
                Ok(scraped) => scraped,
                Err(error) => {
                    tracing::warn!(%error, "preventive web search failed");
                    return SEARCH_APOLOGY.to_string();
                }
            };
            context = self.cached(&disease).await;
            if context.is_empty() {
                context = scraped.into_iter().take(RETRIEVAL_K).collect();
            }
        }
        if context.is_empty() {
            return NOTHING_FOUND.to_string();
        }
        match self
            .llm
            .complete(&preventive_answer_prompt(query), Some(&context.join("\n\n")))
            .await
        {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "preventive completion failed");
                COMPLETION_APOLOGY.to_string()
            }
        }
    }
}

#[async_trait]
impl Node<ConsultState> for GuidanceNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::TranscribedText])
            .writes([StateField::ResponseText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let guidance = self.guidance(state.query()).await;
        let text = format!("{}\n\nFrom the web:\n{}", PREVENTIVE_HEADER, guidance);
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}

/// Appends the "Video links" section to the guidance text.
pub struct MediaNode {
    web: Arc<dyn WebSearch>,
}

impl MediaNode {
    pub const ID: &'static str = "media";

    pub fn new(web: Arc<dyn WebSearch>) -> Self {
        Self { web }
    }

    async fn links(&self, query: &str) -> String {
        match self.web.search(&format!("{} youtube video", query)).await {
            Ok(hits) if hits.is_empty() => NO_VIDEOS.to_string(),
            Ok(hits) => hits
                .iter()
                .take(MAX_VIDEO_LINKS)
                .map(|h| format!("{}: {}", h.title, h.link))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(error) => {
                tracing::warn!(%error, "video search failed");
                VIDEO_APOLOGY.to_string()
            }
        }
    }
}

#[async_trait]
impl Node<ConsultState> for MediaNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::TranscribedText, StateField::ResponseText])
            .writes([StateField::ResponseText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let links = self.links(state.query()).await;
        let text = format!(
            "{}\n\nVideo links:\n{}",
            state.response_text.as_deref().unwrap_or(PREVENTIVE_HEADER),
            links
        );
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}
