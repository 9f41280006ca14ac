//! Builds [`Collaborators`] from a [`SetupConfig`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::consult::Collaborators;
use crate::error::CollaboratorError;
use crate::knowledge::seed::{seed_reference_store, REFERENCE_URLS};
use crate::knowledge::{Embedder, HashingEmbedder, InMemoryKnowledgeStore, KnowledgeStore};

use super::SetupConfig;

/// Sibling of the reference database holding the preventive cache: `kb.db` → `kb-preventive.db`.
pub fn preventive_cache_path(reference: &Path) -> PathBuf {
    let stem = reference
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("knowledge");
    let name = match reference.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-preventive.{}", stem, ext),
        None => format!("{}-preventive", stem),
    };
    reference.with_file_name(name)
}

#[cfg(feature = "sqlite")]
fn open_stores(
    config: &SetupConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<(Arc<dyn KnowledgeStore>, Arc<dyn KnowledgeStore>), CollaboratorError> {
    use crate::knowledge::SqliteKnowledgeStore;

    match &config.knowledge_db {
        Some(path) => {
            let reference = SqliteKnowledgeStore::open(path, embedder.clone())?;
            let cache = SqliteKnowledgeStore::open(&preventive_cache_path(path), embedder)?;
            tracing::info!(path = %path.display(), "knowledge stores opened");
            Ok((Arc::new(reference), Arc::new(cache)))
        }
        None => Ok(in_memory_stores(embedder)),
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_stores(
    config: &SetupConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<(Arc<dyn KnowledgeStore>, Arc<dyn KnowledgeStore>), CollaboratorError> {
    if config.knowledge_db.is_some() {
        tracing::warn!("KNOWLEDGE_DB ignored: built without the sqlite feature");
    }
    Ok(in_memory_stores(embedder))
}

fn in_memory_stores(
    embedder: Arc<dyn Embedder>,
) -> (Arc<dyn KnowledgeStore>, Arc<dyn KnowledgeStore>) {
    (
        Arc::new(InMemoryKnowledgeStore::new(embedder.clone())),
        Arc::new(InMemoryKnowledgeStore::new(embedder)),
    )
}

/// Completion client with the shared system prompt and the configured temperature.
#[cfg(feature = "openai")]
fn chat_client(config: &SetupConfig, key: &str) -> crate::llm::ChatOpenAI {
    use async_openai::config::OpenAIConfig;

    use crate::consult::messages::SYSTEM_PROMPT;

    let openai = OpenAIConfig::new()
        .with_api_key(key)
        .with_api_base(config.api_base());
    crate::llm::ChatOpenAI::with_config(openai, &config.openai_model)
        .with_system_prompt(SYSTEM_PROMPT)
        .with_temperature(config.openai_temperature)
}

#[cfg(feature = "openai")]
fn attach_llm(config: &SetupConfig, key: &str, c: &mut Collaborators) {
    use crate::llm::{LlmClassifier, LlmClient};

    let chat = chat_client(config, key);
    tracing::info!(
        model = chat.model(),
        temperature = config.openai_temperature,
        "completion client configured"
    );
    let llm: Arc<dyn LlmClient> = Arc::new(chat);
    c.classifier = Arc::new(LlmClassifier::new(llm.clone()));
    c.llm = llm;
}

/// Hosted embeddings when `embedding_model` is set and a key is available, otherwise the
/// offline hashing embedder.
#[cfg(feature = "openai")]
fn select_embedder(config: &SetupConfig) -> Arc<dyn Embedder> {
    use async_openai::config::OpenAIConfig;

    use crate::knowledge::OpenAIEmbedder;

    match (&config.embedding_model, &config.openai_api_key) {
        (Some(model), Some(key)) if !config.offline => {
            let openai = OpenAIConfig::new()
                .with_api_key(key)
                .with_api_base(config.api_base());
            let embedder = OpenAIEmbedder::with_config(openai, model);
            tracing::info!(model = embedder.model(), "embedding client configured");
            Arc::new(embedder)
        }
        (Some(_), None) if !config.offline => {
            tracing::warn!("EMBEDDING_MODEL set without OPENAI_API_KEY, using hashed embeddings");
            Arc::new(HashingEmbedder::default())
        }
        _ => Arc::new(HashingEmbedder::default()),
    }
}

#[cfg(not(feature = "openai"))]
fn select_embedder(config: &SetupConfig) -> Arc<dyn Embedder> {
    if config.embedding_model.is_some() {
        tracing::warn!("EMBEDDING_MODEL ignored: built without the openai feature");
    }
    Arc::new(HashingEmbedder::default())
}

#[cfg(not(feature = "openai"))]
fn attach_llm(_config: &SetupConfig, _key: &str, _c: &mut Collaborators) {
    tracing::warn!("built without the openai feature, completions stay mocked");
}

#[cfg(feature = "remote")]
fn attach_remote(config: &SetupConfig, c: &mut Collaborators) {
    use crate::speech::{ElevenLabsSpeech, WhisperTranscriber};
    use crate::vision::OpenAiVision;
    use crate::web::SerperClient;

    if let Some(key) = &config.openai_api_key {
        let mut stt = WhisperTranscriber::new(key, config.api_base());
        if let Some(model) = &config.stt_model {
            stt = stt.with_model(model);
        }
        c.stt = Arc::new(stt);
        let mut vision = OpenAiVision::new(key, config.api_base());
        if let Some(model) = &config.vision_model {
            vision = vision.with_model(model);
        }
        c.vision = Arc::new(vision);
    }
    if let Some(key) = &config.elevenlabs_api_key {
        let mut tts = ElevenLabsSpeech::new(key, &config.output_dir);
        if let Some(voice) = &config.elevenlabs_voice_id {
            tts = tts.with_voice(voice);
        }
        c.tts = Arc::new(tts);
    } else {
        tracing::warn!("ELEVENLABS_API_KEY not set, replies will have no audio");
    }
    if let Some(key) = &config.serper_api_key {
        let serper = Arc::new(SerperClient::new(key));
        c.web = serper.clone();
        c.places = serper;
    } else {
        tracing::warn!("SERPER_API_KEY not set, web search returns nothing");
    }
}

#[cfg(not(feature = "remote"))]
fn attach_remote(_config: &SetupConfig, _c: &mut Collaborators) {
    tracing::warn!("built without the remote feature, speech, vision and search stay mocked");
}

/// Builds the collaborators for `config` and seeds the reference store when it is empty.
///
/// Without keys (or with `offline`) the result equals [`Collaborators::offline`] plus
/// seeded stores. Fails only when a store cannot be opened or written.
pub async fn build_collaborators(config: &SetupConfig) -> Result<Collaborators, CollaboratorError> {
    let (reference, preventive_cache) = open_stores(config, select_embedder(config))?;
    let mut c = Collaborators {
        reference,
        preventive_cache,
        ..Collaborators::offline()
    };

    if config.offline {
        tracing::info!("offline mode: all collaborators mocked");
    } else {
        match &config.openai_api_key {
            Some(key) => attach_llm(config, key, &mut c),
            None => tracing::warn!("OPENAI_API_KEY not set, completions stay mocked"),
        }
        attach_remote(config, &mut c);
    }

    if c.reference.count().await? == 0 {
        let added = seed_reference_store(c.reference.as_ref(), c.web.as_ref(), &REFERENCE_URLS).await?;
        tracing::info!(added, "reference knowledge seeded");
    }
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The preventive cache file sits next to the reference database.
    #[test]
    fn preventive_cache_is_a_sibling() {
        assert_eq!(
            preventive_cache_path(Path::new("data/kb.db")),
            PathBuf::from("data/kb-preventive.db")
        );
        assert_eq!(
            preventive_cache_path(Path::new("kb")),
            PathBuf::from("kb-preventive")
        );
    }

    /// **Scenario**: Offline setup seeds the reference store with the fallback passages.
    #[tokio::test]
    async fn offline_setup_seeds_fallbacks() {
        let config = SetupConfig {
            offline: true,
            ..SetupConfig::default()
        };
        let c = build_collaborators(&config).await.unwrap();
        assert_eq!(c.reference.count().await.unwrap(), 3);
        assert_eq!(c.preventive_cache.count().await.unwrap(), 0);
    }

    /// **Scenario**: Without an embedding model, or offline, the hashing embedder is used.
    #[test]
    fn hashing_embedder_by_default() {
        let offline = SetupConfig {
            offline: true,
            embedding_model: Some("text-embedding-3-small".into()),
            openai_api_key: Some("key".into()),
            ..SetupConfig::default()
        };
        assert_eq!(select_embedder(&offline).dimension(), 512);
        assert_eq!(select_embedder(&SetupConfig::default()).min_relevance(), 0.0);
    }

    /// **Scenario**: The completion client carries the system prompt and the configured
    /// temperature.
    #[cfg(feature = "openai")]
    #[test]
    fn chat_client_uses_system_prompt_and_temperature() {
        use crate::consult::messages::SYSTEM_PROMPT;

        let chat = chat_client(&SetupConfig::default(), "key");
        assert_eq!(chat.model(), "gpt-4o-mini");
        assert_eq!(chat.temperature(), Some(0.2));
        assert_eq!(chat.system_prompt(), Some(SYSTEM_PROMPT));

        let warm = SetupConfig {
            openai_temperature: 0.7,
            ..SetupConfig::default()
        };
        assert_eq!(chat_client(&warm, "key").temperature(), Some(0.7));
    }

    /// **Scenario**: An embedding model plus a key selects the hosted embedder.
    #[cfg(feature = "openai")]
    #[test]
    fn embedding_model_selects_hosted_embedder() {
        let config = SetupConfig {
            embedding_model: Some("text-embedding-3-small".into()),
            openai_api_key: Some("key".into()),
            ..SetupConfig::default()
        };
        let embedder = select_embedder(&config);
        assert_eq!(embedder.dimension(), 1536);
        assert!(embedder.min_relevance() > 0.0);
    }

    /// **Scenario**: A persistent store is seeded once and reused on the next start.
    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn persistent_store_is_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = SetupConfig {
            offline: true,
            knowledge_db: Some(dir.path().join("kb.db")),
            ..SetupConfig::default()
        };
        let first = build_collaborators(&config).await.unwrap();
        assert_eq!(first.reference.count().await.unwrap(), 3);
        drop(first);
        let second = build_collaborators(&config).await.unwrap();
        assert_eq!(second.reference.count().await.unwrap(), 3);
        assert!(dir.path().join("kb-preventive.db").exists());
    }
}
