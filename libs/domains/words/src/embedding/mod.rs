mod config;
mod hashing;
mod openai;
mod provider;

pub use config::{EmbeddingConfig, EmbeddingProviderType, create_embedding_provider};
pub use hashing::HashingProvider;
pub use openai::{OpenAICompatibleConfig, OpenAICompatibleProvider};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
