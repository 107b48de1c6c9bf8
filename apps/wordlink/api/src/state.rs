use std::sync::Arc;

use domain_words::{
    Annotator, AzureOpenAIProvider, BootstrapStatus, SearchService, VocabularyBootstrapper,
    WordsState, create_embedding_provider, create_vector_store,
};
use eyre::WrapErr;
use tracing::info;

use crate::config::Config;

/// Wires providers and store together and runs the vocabulary bootstrap.
///
/// Bootstrap failures leave the service running in a degraded state
/// (visible on `/ready`), except for an embedding dimension mismatch.
pub async fn build_state(config: &Config) -> eyre::Result<WordsState> {
    let embedder = create_embedding_provider(&config.embedding)
        .wrap_err("Failed to create embedding provider")?;
    let store = create_vector_store(&config.store).wrap_err("Failed to open vector store")?;

    let annotator = match &config.completion {
        Some(completion) => {
            info!(deployment = %completion.deployment, "Annotating results with Azure OpenAI");
            let provider = AzureOpenAIProvider::new(completion.clone())
                .wrap_err("Failed to create completion provider")?;
            Annotator::new(Arc::new(provider))
        }
        None => {
            info!("Azure OpenAI not configured, results use the fallback reason");
            Annotator::disabled()
        }
    };

    let bootstrap = BootstrapStatus::default();
    VocabularyBootstrapper::new(embedder.clone(), store.clone(), config.words.clone())
        .initialize_and_record(&bootstrap)
        .await
        .wrap_err("Vector store is incompatible with the embedding model")?;

    let service =
        SearchService::new(embedder, store, config.words.clone()).with_annotator(annotator);

    Ok(WordsState::new(service, bootstrap))
}
