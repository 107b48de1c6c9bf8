use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::annotator::Annotator;
use crate::embedding::EmbeddingProvider;
use crate::error::{WordsError, WordsResult};
use crate::models::{DbStatus, SearchResult};
use crate::settings::WordsSettings;
use crate::store::VectorStore;

/// Embed → query → threshold → annotate
pub struct SearchService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    annotator: Annotator,
    settings: WordsSettings,
}

impl SearchService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        settings: WordsSettings,
    ) -> Self {
        Self {
            embedder,
            store,
            annotator: Annotator::disabled(),
            settings,
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    /// The fixed vocabulary, in list order
    pub fn words(&self) -> &[String] {
        &self.settings.vocabulary
    }

    /// Vocabulary words related to `user_word`, best match first.
    ///
    /// The word is embedded and quoted in the annotation prompt exactly as given.
    /// At most `result_limit` results, each scoring strictly above `score_threshold`.
    /// Embedding and store failures abort the whole search; annotation never does.
    #[instrument(skip(self))]
    pub async fn search(&self, user_word: &str) -> WordsResult<Vec<SearchResult>> {
        if user_word.trim().is_empty() {
            return Err(WordsError::Validation(
                "user_word must not be blank".to_string(),
            ));
        }

        let vector = self.embedder.embed(user_word).await?;
        let candidates = self
            .store
            .query(
                &self.settings.collection_name,
                vector,
                self.settings.result_limit,
            )
            .await?;

        let threshold = self.settings.score_threshold;
        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates
            .into_iter()
            .take(self.settings.result_limit)
            .filter(|c| c.score > threshold)
        {
            let word = candidate
                .payload
                .map(|p| p.word)
                .ok_or_else(|| {
                    WordsError::Internal(format!("Point {} has no word payload", candidate.id))
                })?;

            let reason = self.annotator.explain(user_word, &word).await;
            results.push(SearchResult {
                word,
                reason,
                score: round_score(candidate.score),
            });
        }

        debug!(matches = results.len(), "Search complete");
        Ok(results)
    }

    /// Collection statistics, with any failure folded into [`DbStatus::Error`].
    pub async fn db_status(&self) -> DbStatus {
        let name = &self.settings.collection_name;
        match self.store.collection_info(name).await {
            Ok(info) => DbStatus::Connected {
                collection: name.clone(),
                points_count: info.points_count,
                vectors_count: info.vectors_count,
            },
            Err(e) => {
                warn!(error = %e, "Vector store status check failed");
                DbStatus::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Clamps to `[0, 1]` and rounds to two decimals, halves to even.
fn round_score(score: f32) -> f64 {
    let clamped = f64::from(score).clamp(0.0, 1.0);
    (clamped * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::FALLBACK_REASON;
    use crate::completion::MockCompletionProvider;
    use crate::embedding::MockEmbeddingProvider;
    use crate::models::{CollectionInfo, ScoredPoint, WordPayload};
    use crate::store::MockVectorStore;
    use mockall::predicate::*;

    fn scored(id: u64, word: &str, score: f32) -> ScoredPoint {
        ScoredPoint {
            id,
            score,
            payload: Some(WordPayload::new(word)),
        }
    }

    fn embedder() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .times(1)
            .returning(|_| Ok(vec![0.5; 384]));
        embedder
    }

    fn store_returning(points: Vec<ScoredPoint>) -> MockVectorStore {
        let mut store = MockVectorStore::new();
        store
            .expect_query()
            .with(eq("words_collection"), always(), eq(5))
            .times(1)
            .returning(move |_, _, _| Ok(points.clone()));
        store
    }

    fn echo_annotator() -> Annotator {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .returning(|request| Ok(format!("reason for {}", request.prompt)));
        Annotator::new(Arc::new(provider))
    }

    fn service(embedder: MockEmbeddingProvider, store: MockVectorStore) -> SearchService {
        SearchService::new(
            Arc::new(embedder),
            Arc::new(store),
            WordsSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_search_filters_and_rounds() {
        let store = store_returning(vec![
            scored(4, "dog", 0.8123),
            scored(23, "bird", 0.456),
            scored(24, "love", 0.3),
            scored(11, "family", 0.12),
        ]);

        let results = service(embedder(), store)
            .with_annotator(echo_annotator())
            .search("puppy")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].word, "dog");
        assert_eq!(results[0].score, 0.81);
        assert_eq!(results[1].word, "bird");
        assert_eq!(results[1].score, 0.46);
        assert_eq!(
            results[0].reason,
            "reason for Connect 'puppy' and 'dog' in one short sentence."
        );
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let store = store_returning(vec![scored(0, "peace", 0.3)]);

        let results = service(embedder(), store).search("calm").await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_keep_store_order_and_limit() {
        let store = store_returning(vec![
            scored(0, "sun", 0.95),
            scored(1, "sky", 0.9),
            scored(2, "rain", 0.85),
            scored(3, "snow", 0.8),
            scored(4, "wind", 0.75),
            scored(5, "fire", 0.7),
        ]);

        let results = service(embedder(), store).search("weather").await.unwrap();

        assert_eq!(results.len(), 5);
        let words: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["sun", "sky", "rain", "snow", "wind"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_annotation_failure_uses_fallback() {
        let store = store_returning(vec![scored(4, "dog", 0.7)]);

        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(WordsError::Completion("connection refused".to_string())));

        let results = service(embedder(), store)
            .with_annotator(Annotator::new(Arc::new(provider)))
            .search("puppy")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reason, FALLBACK_REASON);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .returning(|_| Err(WordsError::Embedding("model unavailable".to_string())));
        let mut store = MockVectorStore::new();
        store.expect_query().never();

        let result = service(embedder, store).search("puppy").await;

        assert!(matches!(result, Err(WordsError::Embedding(msg)) if msg == "model unavailable"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockVectorStore::new();
        store
            .expect_query()
            .returning(|name, _, _| Err(WordsError::CollectionNotFound(name.to_string())));

        let result = service(embedder(), store).search("puppy").await;

        assert!(matches!(result, Err(WordsError::CollectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_payload_is_internal_error() {
        let store = store_returning(vec![ScoredPoint {
            id: 9,
            score: 0.9,
            payload: None,
        }]);

        let result = service(embedder(), store).search("puppy").await;

        assert!(matches!(result, Err(WordsError::Internal(_))));
    }

    #[tokio::test]
    async fn test_blank_word_is_rejected() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed().never();

        let result = service(embedder, MockVectorStore::new()).search("  ").await;

        assert!(matches!(result, Err(WordsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_db_status_connected() {
        let mut store = MockVectorStore::new();
        store
            .expect_collection_info()
            .with(eq("words_collection"))
            .returning(|name| {
                Ok(CollectionInfo {
                    name: name.to_string(),
                    points_count: 25,
                    vectors_count: Some(25),
                    vector_size: Some(384),
                })
            });

        let status = service(MockEmbeddingProvider::new(), store)
            .db_status()
            .await;

        assert_eq!(
            status,
            DbStatus::Connected {
                collection: "words_collection".to_string(),
                points_count: 25,
                vectors_count: Some(25),
            }
        );
    }

    #[tokio::test]
    async fn test_db_status_error() {
        let mut store = MockVectorStore::new();
        store
            .expect_collection_info()
            .returning(|name| Err(WordsError::CollectionNotFound(name.to_string())));

        let status = service(MockEmbeddingProvider::new(), store)
            .db_status()
            .await;

        assert_eq!(
            status,
            DbStatus::Error {
                message: "Collection not found: words_collection".to_string(),
            }
        );
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.8149), 0.81);
        assert_eq!(round_score(0.8151), 0.82);
        assert_eq!(round_score(1.0000001), 1.0);
        assert_eq!(round_score(-0.2), 0.0);
    }

    #[test]
    fn test_round_score_halves_to_even() {
        // Both are exact in f32
        assert_eq!(round_score(0.625), 0.62);
        assert_eq!(round_score(0.375), 0.38);
    }

    #[tokio::test]
    async fn test_search_keeps_word_as_given() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .with(eq(" Dog"))
            .times(1)
            .returning(|_| Ok(vec![0.5; 384]));
        let store = store_returning(vec![scored(4, "dog", 0.9)]);

        let results = service(embedder, store)
            .with_annotator(echo_annotator())
            .search(" Dog")
            .await
            .unwrap();

        assert_eq!(
            results[0].reason,
            "reason for Connect ' Dog' and 'dog' in one short sentence."
        );
    }

    #[test]
    fn test_words_returns_vocabulary() {
        let service = service(MockEmbeddingProvider::new(), MockVectorStore::new());
        assert_eq!(service.words().len(), 25);
        assert_eq!(service.words()[4], "dog");
    }
}
