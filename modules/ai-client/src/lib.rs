pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::{Gemini, GeminiOutputBuilder, GeminiPromptBuilder, StructuredOutput};
pub use traits::{Agent, Message, MessageRole, OutputBuilder, PromptBuilder};
pub use util::{extract_json_array, strip_code_blocks, truncate_to_char_boundary};
