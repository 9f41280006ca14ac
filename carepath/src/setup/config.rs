//! Configuration for building the consultation collaborators.

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Completion temperature when `OPENAI_TEMPERATURE` is unset.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Keys, endpoints and paths for the collaborators. Every key is optional; a missing key
/// leaves the matching collaborator on its offline mock.
#[derive(Clone, Debug)]
pub struct SetupConfig {
    /// OpenAI-compatible API key, used for completion, classification, vision and
    /// transcription.
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible base URL, e.g. `https://api.groq.com/openai/v1`.
    pub openai_api_base: String,
    pub openai_model: String,
    /// Sampling temperature for completions.
    pub openai_temperature: f32,
    /// Hosted embedding model for the knowledge stores. The offline hashing embedder when
    /// None. Changing it invalidates vectors already stored in `knowledge_db`.
    pub embedding_model: Option<String>,
    /// Vision model; the client default when None.
    pub vision_model: Option<String>,
    /// Transcription model; the client default when None.
    pub stt_model: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    pub serper_api_key: Option<String>,
    /// SQLite file for the reference knowledge. In-memory stores when None.
    pub knowledge_db: Option<PathBuf>,
    /// Directory for synthesized replies.
    pub output_dir: PathBuf,
    /// Ignore every key and use mocks only.
    pub offline: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_base: DEFAULT_API_BASE.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            openai_temperature: DEFAULT_TEMPERATURE,
            embedding_model: None,
            vision_model: None,
            stt_model: None,
            elevenlabs_api_key: None,
            elevenlabs_voice_id: None,
            serper_api_key: None,
            knowledge_db: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            offline: false,
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl SetupConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_API_BASE`, `OPENAI_MODEL`, `OPENAI_TEMPERATURE`,
    /// `EMBEDDING_MODEL`, `VISION_MODEL`,
    /// `STT_MODEL`, `ELEVENLABS_API_KEY`, `ELEVENLABS_VOICE_ID`, `SERPER_API_KEY`,
    /// `KNOWLEDGE_DB` and `OUTPUT_DIR`. Does not load `.env`; callers do.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_api_base: var("OPENAI_API_BASE").unwrap_or(defaults.openai_api_base),
            openai_model: var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_temperature: var("OPENAI_TEMPERATURE")
                .and_then(|t| t.trim().parse().ok())
                .unwrap_or(defaults.openai_temperature),
            embedding_model: var("EMBEDDING_MODEL"),
            vision_model: var("VISION_MODEL"),
            stt_model: var("STT_MODEL"),
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: var("ELEVENLABS_VOICE_ID"),
            serper_api_key: var("SERPER_API_KEY"),
            knowledge_db: var("KNOWLEDGE_DB").map(PathBuf::from),
            output_dir: var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            offline: false,
        }
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.openai_api_base.trim_end_matches('/')
    }
}
