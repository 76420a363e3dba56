use ai_client::{
    extract_json_array, truncate_to_char_boundary, Agent, AiError, Gemini, PromptBuilder,
    StructuredOutput,
};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use omniscout_common::{GenerationRequest, GenerationResult, SamplingParams};

use crate::prompt::render_prompt;

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate intelligence. The AI model encountered an error parsing the complex dork structure. Please try again with fewer categories or a different target.";

const LOGGED_EXCERPT_BYTES: usize = 500;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a generation call failed. Operator-facing only; users see
/// [`GenerationError`]'s fixed message.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("model call failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("no response text generated from AI model")]
    EmptyResponse,

    #[error("response did not match the dork schema: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GenerationFailure {
    fn from_model_error(err: anyhow::Error) -> Self {
        if matches!(err.downcast_ref::<AiError>(), Some(AiError::EmptyResponse)) {
            GenerationFailure::EmptyResponse
        } else {
            GenerationFailure::Transport(err)
        }
    }
}

/// The single user-facing failure of a generation call.
#[derive(Debug, Error)]
#[error("{}", GENERATION_FAILED_MESSAGE)]
pub struct GenerationError {
    #[from]
    failure: GenerationFailure,
}

impl GenerationError {
    pub fn failure(&self) -> &GenerationFailure {
        &self.failure
    }
}

// ---------------------------------------------------------------------------
// TextGenerator: the one outbound call
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run the model once on `prompt`, constraining output to `schema`, and
    /// return the raw response text.
    async fn generate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        sampling: SamplingParams,
    ) -> Result<String>;
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        sampling: SamplingParams,
    ) -> Result<String> {
        self.prompt(prompt)
            .temperature(sampling.temperature)
            .top_k(sampling.top_k)
            .top_p(sampling.top_p)
            .response_schema(schema.clone())
            .send()
            .await
    }
}

/// Shape the model must return: an array of categories, each with its dorks.
pub fn response_schema() -> serde_json::Value {
    GenerationResult::gemini_schema()
}

// ---------------------------------------------------------------------------
// QueryGateway
// ---------------------------------------------------------------------------

/// Turns a [`GenerationRequest`] into a [`GenerationResult`] with exactly one
/// model call. All-or-nothing: no retries, no partial results.
pub struct QueryGateway<G> {
    generator: G,
    sampling: SamplingParams,
}

impl<G: TextGenerator> QueryGateway<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn sampling(&self) -> SamplingParams {
        self.sampling
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerationError> {
        info!(
            platform = %request.platform(),
            smart = request.is_smart(),
            categories = request.categories().len(),
            "Generating dorks"
        );

        match self.call_model(request).await {
            Ok(result) => {
                info!(
                    categories = result.categories().len(),
                    dorks = result.total_dorks(),
                    "Dork generation complete"
                );
                Ok(result)
            }
            Err(failure) => {
                error!(error = %failure, "Gemini dork generation failed");
                Err(failure.into())
            }
        }
    }

    async fn call_model(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerationFailure> {
        let prompt = render_prompt(request);
        let schema = response_schema();

        let text = self
            .generator
            .generate(&prompt, &schema, self.sampling)
            .await
            .map_err(GenerationFailure::from_model_error)?;

        if text.trim().is_empty() {
            return Err(GenerationFailure::EmptyResponse);
        }

        let json = extract_json_array(&text);
        debug!(raw_len = text.len(), sanitized_len = json.len(), "Sanitized model response");

        serde_json::from_str(json).map_err(|e| {
            warn!(
                excerpt = truncate_to_char_boundary(json, LOGGED_EXCERPT_BYTES),
                "Model response is not a valid dork array"
            );
            GenerationFailure::Parse(e)
        })
    }
}
