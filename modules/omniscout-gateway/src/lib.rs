pub mod export;
pub mod gateway;
pub mod platform_syntax;
pub mod prompt;
pub mod report;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use export::ExportFormat;
pub use gateway::{
    response_schema, GenerationError, GenerationFailure, QueryGateway, TextGenerator,
    GENERATION_FAILED_MESSAGE,
};
pub use prompt::render_prompt;
