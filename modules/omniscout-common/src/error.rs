use thiserror::Error;

/// A generation request that must not reach the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Target must not be empty")]
    EmptyTarget,

    #[error("Select at least one category, or enable smart mode")]
    NoCategories,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}
