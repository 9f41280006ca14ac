//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Any OpenAI-compatible endpoint works through the config's base URL (Groq included).
//! `setup` builds it with the shared system prompt and the configured temperature.
//!
//! **Interaction**: Implements `LlmClient`; wrapped by `LlmClassifier` for routing.
//! Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::CollaboratorError;
use crate::llm::LlmClient;

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Key and base URL come from the `OpenAIConfig` passed to [`ChatOpenAI::with_config`].
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            system_prompt: None,
            temperature: None,
        }
    }

    /// System message sent before every prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Retrieved context goes ahead of the prompt in the user message.
    fn user_content(prompt: &str, context: Option<&str>) -> String {
        match context {
            Some(ctx) if !ctx.trim().is_empty() => format!("Context:\n{}\n\n{}", ctx, prompt),
            _ => prompt.to_string(),
        }
    }

    fn request_messages(&self, prompt: &str, context: Option<&str>) -> Vec<ChatCompletionRequestMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(system.as_str()),
            ));
        }
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(Self::user_content(prompt, context).as_str()),
        ));
        messages
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn complete(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(self.request_messages(prompt, context));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args.build().map_err(|e| {
            CollaboratorError::Completion(format!("OpenAI request build failed: {}", e))
        })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CollaboratorError::Completion(format!("OpenAI API error: {}", e)))?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            CollaboratorError::Completion("OpenAI returned no choices".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}
