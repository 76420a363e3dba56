use std::marker::PhantomData;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::traits::{Message, MessageRole, OutputBuilder, PromptBuilder};
use crate::util::strip_code_blocks;

use super::schema::StructuredOutput;
use super::types::*;
use super::Gemini;

const JSON_MIME_TYPE: &str = "application/json";

pub struct GeminiPromptBuilder {
    agent: Gemini,
    input: String,
    preamble: Option<String>,
    messages: Vec<Message>,
    config: GenerationConfig,
}

impl GeminiPromptBuilder {
    pub(crate) fn new(agent: Gemini, input: String) -> Self {
        Self {
            agent,
            input,
            preamble: None,
            messages: Vec::new(),
            config: GenerationConfig::default(),
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.config.top_k = Some(top_k);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = Some(top_p);
        self
    }

    /// Constrain the response to JSON matching `schema`.
    ///
    /// `send()` still returns the raw text so callers can apply their own
    /// recovery before parsing.
    pub fn response_schema(mut self, schema: serde_json::Value) -> Self {
        self.config.response_mime_type = Some(JSON_MIME_TYPE.to_string());
        self.config.response_schema = Some(schema);
        self
    }

    /// Create a structured output builder for extracting typed data.
    pub fn output<T: DeserializeOwned + JsonSchema + Send + 'static>(
        self,
    ) -> GeminiOutputBuilder<T> {
        GeminiOutputBuilder {
            builder: self.response_schema(T::gemini_schema()),
            _phantom: PhantomData,
        }
    }

    fn build_request(&self) -> GenerateContentRequest {
        let mut request = GenerateContentRequest::new();
        let mut system = self.preamble.clone();

        for msg in &self.messages {
            match msg.role {
                MessageRole::System => {
                    system = Some(match system {
                        Some(existing) => format!("{existing}\n\n{}", msg.content),
                        None => msg.content.clone(),
                    });
                }
                MessageRole::User => request = request.content(Content::user(&msg.content)),
                MessageRole::Assistant => request = request.content(Content::model(&msg.content)),
            }
        }

        if let Some(system) = system {
            request = request.system_instruction(system);
        }

        if !self.input.is_empty() {
            request = request.content(Content::user(&self.input));
        }

        request.generation_config(self.config.clone())
    }
}

#[async_trait]
impl PromptBuilder for GeminiPromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    async fn send(self) -> Result<String> {
        let request = self.build_request();
        if request.contents.is_empty() {
            return Err(anyhow!("Prompt has no user content"));
        }

        self.agent
            .client()
            .generate_text(&self.agent.model, &request)
            .await
    }
}

// =============================================================================
// Structured Output Builder
// =============================================================================

pub struct GeminiOutputBuilder<T> {
    builder: GeminiPromptBuilder,
    _phantom: PhantomData<T>,
}

#[async_trait]
impl<T: DeserializeOwned + JsonSchema + Send + 'static> OutputBuilder<T>
    for GeminiOutputBuilder<T>
{
    async fn send(self) -> Result<T> {
        debug!(
            type_name = T::type_name(),
            "Gemini structured output extraction"
        );

        let text = PromptBuilder::send(self.builder).await?;

        serde_json::from_str(strip_code_blocks(&text))
            .map_err(|e| anyhow!("Failed to deserialize response: {}", e))
    }
}
