//! Words Domain Library
//!
//! Word-association search over a fixed vocabulary: a user word is embedded,
//! matched against the vocabulary vectors, and each match is annotated with a
//! short explanation from a language model.
//!
//! # Architecture
//!
//! ```text
//!                 ┌─────────────────┐
//!                 │  SearchService  │  ← embed → query → threshold → annotate
//!                 └────────┬────────┘
//!        ┌─────────────────┼──────────────────┐
//! ┌──────▼───────────┐ ┌───▼──────────┐ ┌─────▼──────┐
//! │ EmbeddingProvider│ │ VectorStore  │ │ Annotator  │
//! │     (trait)      │ │   (trait)    │ └─────┬──────┘
//! └──────┬───────────┘ └───┬──────────┘ ┌─────▼─────────────┐
//!  OpenAICompatible     LocalStore      │CompletionProvider │
//!  HashingProvider      QdrantStore     │ AzureOpenAIProvider│
//!                                       └───────────────────┘
//! ```
//!
//! [`VocabularyBootstrapper`] fills the collection at startup.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_words::{
//!     Annotator, HashingProvider, LocalStore, SearchService, VocabularyBootstrapper,
//!     WordsSettings, DEFAULT_EMBEDDING_DIMENSION,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = Arc::new(HashingProvider::new(DEFAULT_EMBEDDING_DIMENSION));
//! let store = Arc::new(LocalStore::open("./qdrant_data")?);
//! let settings = WordsSettings::default();
//!
//! VocabularyBootstrapper::new(embedder.clone(), store.clone(), settings.clone())
//!     .initialize()
//!     .await?;
//!
//! let service = SearchService::new(embedder, store, settings).with_annotator(Annotator::disabled());
//! let results = service.search("puppy").await?;
//! # Ok(())
//! # }
//! ```

pub mod annotator;
pub mod bootstrap;
pub mod completion;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use annotator::{Annotator, FALLBACK_REASON};
pub use bootstrap::{BootstrapOutcome, BootstrapState, BootstrapStatus, VocabularyBootstrapper};
pub use completion::{AzureOpenAIConfig, AzureOpenAIProvider, CompletionProvider, CompletionRequest};
pub use embedding::{
    EmbeddingConfig, EmbeddingProvider, EmbeddingProviderType, HashingProvider,
    OpenAICompatibleConfig, OpenAICompatibleProvider, create_embedding_provider,
};
pub use error::{WordsError, WordsResult};
pub use handlers::{WordsApiDoc, WordsState, router};
pub use models::{
    CollectionInfo, DbStatus, ScoredPoint, SearchRequest, SearchResult,
    VectorParams, VectorPoint, WordPayload, WordsResponse,
};
pub use service::SearchService;
pub use settings::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_RESULT_LIMIT, DEFAULT_SCORE_THRESHOLD, VOCABULARY, WordsSettings,
};
pub use store::{
    LocalStore, QdrantConfig, QdrantStore, StoreBackend, StoreConfig, VectorStore,
    create_vector_store, ensure_collection,
};
