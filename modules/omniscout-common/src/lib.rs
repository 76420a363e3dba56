pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ExportConfig, FileConfig, ModelConfig, SamplingParams};
pub use error::{ParseEnumError, RequestError};
pub use types::*;
