// Test mocks for the query gateway.
//
// - MockGenerator (TextGenerator): scripted response text, records every call
//
// Plus helpers for building model responses.

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use omniscout_common::{CategoryResult, Dork, GenerationResult, Intent, SamplingParams};

use crate::gateway::TextGenerator;

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub schema: serde_json::Value,
    pub sampling: SamplingParams,
}

enum Script {
    Text(String),
    Fail(String),
}

/// In-memory text generator. Returns the same scripted outcome on every call.
/// Builder pattern: `MockGenerator::responding(..)`, `::with_result(..)`, `::failing(..)`.
pub struct MockGenerator {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            script: Script::Text(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `result` serialized the way the model would.
    pub fn with_result(result: &GenerationResult) -> Self {
        let text = serde_json::to_string(result).unwrap_or_default();
        Self::responding(text)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls().pop().map(|c| c.prompt)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        sampling: SamplingParams,
    ) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                schema: schema.clone(),
                sampling,
            });
        }

        match &self.script {
            Script::Text(text) => Ok(text.clone()),
            Script::Fail(message) => bail!("MockGenerator: {message}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn dork(query: &str, category: &str, intent: Intent) -> Dork {
    Dork {
        query: query.to_string(),
        description: format!("Finds {query}"),
        category: category.to_string(),
        intent,
    }
}

/// A category holding one dork per `(query, intent)` pair.
pub fn category(name: &str, dorks: &[(&str, Intent)]) -> CategoryResult {
    CategoryResult {
        category_name: name.to_string(),
        dorks: dorks
            .iter()
            .map(|(query, intent)| dork(query, name, *intent))
            .collect(),
    }
}
