use std::sync::Arc;

use tracing::{debug, warn};

use crate::completion::{CompletionProvider, CompletionRequest};

/// Returned whenever the completion provider is missing or fails
pub const FALLBACK_REASON: &str = "Both words share conceptual meaning";

const SYSTEM_PROMPT: &str = "Give one short reason about word relationship.";
const MAX_REASON_TOKENS: u32 = 30;

/// Explains how two words relate, best-effort.
#[derive(Clone)]
pub struct Annotator {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Annotator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An annotator that always answers with [`FALLBACK_REASON`]
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// One short sentence connecting `word_a` and `word_b`. Never fails.
    pub async fn explain(&self, word_a: &str, word_b: &str) -> String {
        let Some(provider) = &self.provider else {
            debug!("No completion provider configured, using fallback reason");
            return FALLBACK_REASON.to_string();
        };

        let request = Self::request(word_a, word_b);
        match provider.complete(&request).await {
            Ok(reason) => reason,
            Err(e) => {
                warn!(word_a, word_b, error = %e, "Annotation failed, using fallback reason");
                FALLBACK_REASON.to_string()
            }
        }
    }

    fn request(word_a: &str, word_b: &str) -> CompletionRequest {
        CompletionRequest::new(format!(
            "Connect '{}' and '{}' in one short sentence.",
            word_a, word_b
        ))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(MAX_REASON_TOKENS)
    }
}
