mod azure;
mod provider;

pub use azure::{AzureOpenAIConfig, AzureOpenAIProvider};
pub use provider::{CompletionProvider, CompletionRequest};

#[cfg(test)]
pub use provider::MockCompletionProvider;
