//! Deterministic local embeddings for offline development.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{EmbeddingProvider, EmbeddingProviderType};
use crate::error::WordsResult;

/// Hashes character trigrams and whole tokens into a fixed-size unit vector.
///
/// Not semantically meaningful like a sentence-transformer, but stable across runs,
/// so identical text always maps to the same vector and shared spelling raises similarity.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return embedding;
        }

        let lower = text.to_lowercase();
        let mut token_freq: HashMap<&str, u32> = HashMap::new();
        for token in lower.split_whitespace() {
            *token_freq.entry(token).or_insert(0) += 1;
        }

        for (token, freq) in token_freq {
            // Boundary markers give short words at least one trigram
            let chars: Vec<char> = format!("^{}$", token).chars().collect();
            for window in chars.windows(3) {
                let trigram_hash = window
                    .iter()
                    .fold(0u64, |acc, c| acc.wrapping_mul(37).wrapping_add(*c as u64));
                embedding[(trigram_hash as usize) % self.dimension] += (freq as f32).sqrt();
            }

            let token_hash = token
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            embedding[(token_hash as usize) % self.dimension] += freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Hashing
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> WordsResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
