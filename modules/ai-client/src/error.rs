use thiserror::Error;

/// Model-side outcomes callers may want to tell apart from transport errors.
/// Carried inside `anyhow::Error`; recover with `downcast_ref::<AiError>()`.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("No response text from Gemini")]
    EmptyResponse,
}
